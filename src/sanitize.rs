//! File name sanitization.

/// Normalizes an arbitrary string into a safe file name.
///
/// Every character outside `[A-Za-z0-9._-]` becomes `_`, then runs of `_`
/// collapse into a single `_`. Total and idempotent.
///
/// # Examples
///
/// ```
/// use redecard_splitter::sanitize_filename;
///
/// assert_eq!(sanitize_filename("12 34/56__EEVC.txt"), "12_34_56_EEVC.txt");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());

    for c in name.chars() {
        let keep = c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-');
        let c = if keep { c } else { '_' };

        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }

    out
}
