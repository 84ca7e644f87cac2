use renova_contracts::errors::RenderError;

/// Runs `primary`; if it fails with a fallback-eligible error, reports the
/// failure and returns whatever `fallback` produces instead. The primary
/// error never reaches the caller in that case.
pub fn attempt_with_fallback<T>(
    primary: impl FnOnce() -> Result<T, RenderError>,
    on_failure: impl FnOnce(&RenderError),
    fallback: impl FnOnce() -> Result<T, RenderError>,
) -> Result<T, RenderError> {
    match primary() {
        Ok(value) => Ok(value),
        Err(err) if err.is_fallback_eligible() => {
            on_failure(&err);
            fallback()
        }
        Err(err) => Err(err),
    }
}
