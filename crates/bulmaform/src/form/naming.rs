//! Parameter names and element ids for form fields.

/// `{object_name}[{method}]`.
#[must_use]
pub fn field_name(object_name: &str, method: &str) -> String {
    format!("{object_name}[{method}]")
}

/// Object name of the child at `index` of `association`.
///
/// ```
/// use bulmaform::form::child_object_name;
///
/// assert_eq!(
///     child_object_name("order", "items", "NEW_RECORD"),
///     "order[items_attributes][NEW_RECORD]"
/// );
/// ```
#[must_use]
pub fn child_object_name(object_name: &str, association: &str, index: &str) -> String {
    format!("{object_name}[{association}_attributes][{index}]")
}

/// An object name usable inside element ids.
///
/// `][` and every character outside `[-A-Za-z0-9:.]` become `_`; one trailing `_` is dropped.
#[must_use]
pub fn sanitized_object_name(object_name: &str) -> String {
    let mut sanitized = object_name.replace("][", "_");
    sanitized = sanitized
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | ':' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.ends_with('_') {
        sanitized.pop();
    }
    sanitized
}

/// `{sanitized_object_name}_{method}`.
#[must_use]
pub fn field_id(object_name: &str, method: &str) -> String {
    format!("{}_{method}", sanitized_object_name(object_name))
}

/// Element id of an association's row template.
///
/// ```
/// use bulmaform::form::template_id;
///
/// assert_eq!(template_id("order", "items", "fields_template"), "order_items_fields_template");
/// ```
#[must_use]
pub fn template_id(object_name: &str, association: &str, suffix: &str) -> String {
    format!(
        "{}_{association}_{suffix}",
        sanitized_object_name(object_name)
    )
}

/// A label for `method`: `unit_price` becomes `Unit price`, `customer_id` becomes `Customer`.
#[must_use]
pub fn humanize(method: &str) -> String {
    let base = method.strip_suffix("_id").unwrap_or(method);
    let spaced = base.trim_matches('_').replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
