//! MCP `ToolAnnotations` derived from HTTP method semantics.

use reqwest::Method;
use rmcp::model::ToolAnnotations;

/// Annotations for a tool backed by a single HTTP verb.
///
/// `openWorldHint` is always set: every tool talks to an external Parse
/// Server. The remaining hints follow RFC 9110 method semantics for the four
/// verbs this API uses.
#[must_use]
pub fn annotations_for_method(method: &Method) -> ToolAnnotations {
    let open_world_hint = Some(true);

    if method == Method::GET {
        return ToolAnnotations {
            title: None,
            read_only_hint: Some(true),
            destructive_hint: Some(false),
            idempotent_hint: Some(true),
            open_world_hint,
        };
    }

    if method == Method::POST {
        return ToolAnnotations {
            title: None,
            read_only_hint: Some(false),
            destructive_hint: Some(false),
            idempotent_hint: Some(false),
            open_world_hint,
        };
    }

    if method == Method::PUT || method == Method::DELETE {
        return ToolAnnotations {
            title: None,
            read_only_hint: Some(false),
            destructive_hint: Some(true),
            idempotent_hint: Some(true),
            open_world_hint,
        };
    }

    ToolAnnotations {
        title: None,
        read_only_hint: None,
        destructive_hint: None,
        idempotent_hint: None,
        open_world_hint,
    }
}

#[cfg(test)]
mod tests {
    use super::annotations_for_method;
    use reqwest::Method;

    #[test]
    fn annotations_set_open_world_for_all_methods() {
        for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
            assert_eq!(
                annotations_for_method(&method).open_world_hint,
                Some(true)
            );
        }
    }

    #[test]
    fn annotations_get_is_readonly_and_idempotent() {
        let annotations = annotations_for_method(&Method::GET);
        assert_eq!(annotations.read_only_hint, Some(true));
        assert_eq!(annotations.destructive_hint, Some(false));
        assert_eq!(annotations.idempotent_hint, Some(true));
    }

    #[test]
    fn annotations_delete_is_destructive() {
        let annotations = annotations_for_method(&Method::DELETE);
        assert_eq!(annotations.read_only_hint, Some(false));
        assert_eq!(annotations.destructive_hint, Some(true));
        assert_eq!(annotations.idempotent_hint, Some(true));
    }
}
