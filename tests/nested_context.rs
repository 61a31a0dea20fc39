use workflow_binding as wfb;
use serde_json::{json, Value};

fn request_context() -> Value {
    json!({
        "request": {
            "headers": {"x-user": "alice"},
            "query": {"page": 2, "ratio": 0.5, "flag": true},
            "body": {
                "items": [
                    {"sku": "A-1", "qty": 3},
                    {"sku": "B-7", "qty": 1}
                ]
            }
        },
        "steps": {
            "lookup": {"output": {"user": {"id": 42, "plan": null}}}
        }
    })
}

#[test]
fn test_scalars_render_as_text() {
    let ctx = request_context();
    assert_eq!(
        wfb::resolve("user=${request.headers.x-user} page=${request.query.page}", &ctx),
        "user=alice page=2"
    );
    assert_eq!(wfb::resolve("${request.query.ratio}/${request.query.flag}", &ctx), "0.5/true");
    assert_eq!(wfb::resolve("${steps.lookup.output.user.plan}", &ctx), "null");
}

#[test]
fn test_array_elements_by_index_segment() {
    let ctx = request_context();
    assert_eq!(wfb::resolve("${request.body.items.1.sku}", &ctx), "B-7");
    assert_eq!(
        wfb::resolve("${request.body.items}", &ctx),
        r#"[{"sku":"A-1","qty":3},{"sku":"B-7","qty":1}]"#
    );
    assert_eq!(wfb::resolve("${request.body.items.sku}", &ctx), "${request.body.items.sku}");
}

#[test]
fn test_unresolved_listing_matches_resolution() {
    let ctx = request_context();
    let template = "${steps.lookup.output.user.id} ${steps.missing.output} ${request.body.items.5}";
    assert_eq!(
        wfb::unresolved(template, &ctx),
        vec!["steps.missing.output", "request.body.items.5"]
    );
    assert_eq!(
        wfb::resolve(template, &ctx),
        "42 ${steps.missing.output} ${request.body.items.5}"
    );
}
