use workflow_binding as wfb;
use serde_json::json;

// A schema the engine cannot compile is reported as a single record whose
// message is the compile error, never as a panic or an Err.
#[test]
fn test_malformed_schema_is_one_record() {
    let schema = json!({"type": "object", "properties": {"n": {"minimum": "zero"}}});
    let result = wfb::validate(&schema, &json!({"n": 1}));
    let errors = result.errors().expect("invalid result");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, wfb::ErrorKind::Internal);
    let text = wfb::format_errors(result.errors());
    assert!(!text.is_empty());
    assert_ne!(text, "Unknown validation error");
}

#[test]
fn test_broken_bindings_stay_visible() {
    let ctx = json!({"a": {"b": 3, "list": [1, 2]}});
    // descent into a number
    assert_eq!(wfb::resolve("${a.b.c}", &ctx), "${a.b.c}");
    // unclosed and empty placeholders are plain text
    assert_eq!(wfb::resolve("${a.b", &ctx), "${a.b");
    assert_eq!(wfb::resolve("${}", &ctx), "${}");
    // one broken binding does not affect the others
    assert_eq!(wfb::resolve("${nope.x}-${a.b}-${a.list.9}", &ctx), "${nope.x}-3-${a.list.9}");
}
