//! Shopping Cart Business Logic Helpers
//!
//! This module contains helper functions for cart operations, session
//! handling and formatting.

use super::models::CartLine;
use axum::http::{header, HeaderMap, HeaderValue};
use uuid::Uuid;

/// Cookie carrying the browser's cart session id
pub const SESSION_COOKIE: &str = "cart_session";

/// Extracts the cart session id from the `Cookie` header.
///
/// Returns the id and whether it was freshly generated. Values that are not
/// UUIDs are replaced, since the id also names the session's storage scope.
pub fn resolve_session_id(headers: &HeaderMap) -> (String, bool) {
    let existing = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok());

    match existing {
        Some(id) => (id.simple().to_string(), false),
        None => (Uuid::new_v4().simple().to_string(), true),
    }
}

/// `Set-Cookie` value that pins `session_id` to the browser.
pub fn session_cookie(session_id: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, session_id
    ))
    .ok()
}

/// Attaches the session cookie to `response` when the session is new.
pub fn with_session_cookie(
    mut response: axum::response::Response,
    session_id: &str,
    is_new_session: bool,
) -> axum::response::Response {
    if is_new_session {
        if let Some(cookie) = session_cookie(session_id) {
            response.headers_mut().insert(header::SET_COOKIE, cookie);
        }
    }
    response
}

/// Merges `new_lines` into `cart_lines`, aggregating quantities for existing
/// products and appending brand new ones.
///
/// # Behaviour
///
/// * Lines are matched on `product.id`; the first snapshot of a product wins.
/// * Zero-quantity lines are dropped.
/// * Quantities saturate instead of overflowing.
///
/// This function mutates `cart_lines` in-place.
pub fn merge_lines(cart_lines: &mut Vec<CartLine>, new_lines: Vec<CartLine>) {
    for incoming in new_lines {
        if incoming.quantity == 0 {
            continue;
        }
        if let Some(existing) = cart_lines
            .iter_mut()
            .find(|l| l.product.id == incoming.product.id)
        {
            existing.quantity = existing.quantity.saturating_add(incoming.quantity);
        } else {
            cart_lines.push(incoming);
        }
    }
}

/// Produces a human-readable one-line summary for a list of cart lines.
///
/// Example output: `"2x Yoga Mat, 1x Desk Lamp"`.
pub fn format_item_summary(lines: &[CartLine]) -> String {
    lines
        .iter()
        .map(|l| format!("{}x {}", l.quantity, l.product.name))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::test_support::product;

    #[test]
    fn test_merge_lines_aggregates_and_drops_empty() {
        let mut lines = vec![CartLine::new(product("a", 1.0), 2)];
        merge_lines(
            &mut lines,
            vec![
                CartLine::new(product("a", 1.0), 3),
                CartLine::new(product("b", 1.0), 0),
                CartLine::new(product("c", 1.0), 1),
                CartLine::new(product("c", 1.0), u32::MAX),
            ],
        );

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].quantity, 5);
        assert_eq!(lines[1].product.id, "c");
        assert_eq!(lines[1].quantity, u32::MAX);
    }

    #[test]
    fn test_format_item_summary() {
        let lines = vec![
            CartLine::new(product("a", 1.0), 2),
            CartLine::new(product("b", 1.0), 1),
        ];
        assert_eq!(format_item_summary(&lines), "2x Product a, 1x Product b");
    }

    #[test]
    fn test_resolve_session_id() {
        let (fresh, is_new) = resolve_session_id(&HeaderMap::new());
        assert!(is_new);

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            format!("theme=dark; {}={}", SESSION_COOKIE, fresh).parse().unwrap(),
        );
        assert_eq!(resolve_session_id(&headers), (fresh.clone(), false));

        let mut bogus = HeaderMap::new();
        bogus.insert(header::COOKIE, "cart_session=../../etc".parse().unwrap());
        let (replaced, is_new) = resolve_session_id(&bogus);
        assert!(is_new);
        assert_ne!(replaced, "../../etc");
    }
}
