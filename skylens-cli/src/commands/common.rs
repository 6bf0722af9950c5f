//! Shared helpers for resolving CLI arguments.

use skylens::capture::TapPoint;

use crate::error::CliError;

/// Resolve an optional tap point from its two coordinate flags.
///
/// Both flags must be present or absent together; a lone coordinate is a
/// usage error.
pub fn resolve_tap(x: Option<f64>, y: Option<f64>) -> Result<Option<TapPoint>, CliError> {
    match (x, y) {
        (Some(x), Some(y)) => Ok(Some(TapPoint::new(x, y))),
        (None, None) => Ok(None),
        _ => Err(CliError::Config(
            "--tap-x and --tap-y must be given together".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_coordinates_make_a_tap() {
        let tap = resolve_tap(Some(412.0), Some(518.0)).unwrap().unwrap();
        assert_eq!(tap.x, 412.0);
        assert_eq!(tap.y, 518.0);
    }

    #[test]
    fn test_neither_coordinate_means_frame_center() {
        assert!(resolve_tap(None, None).unwrap().is_none());
    }

    #[test]
    fn test_lone_coordinate_rejected() {
        assert!(resolve_tap(Some(412.0), None).is_err());
        assert!(resolve_tap(None, Some(518.0)).is_err());
    }
}
