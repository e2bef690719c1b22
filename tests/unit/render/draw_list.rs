use super::*;
use crate::foundation::core::Point;
use crate::resolve::frame::resolve_frame;
use serde_json::{Value, json};

fn frame(background: Option<&str>, children: Value) -> Frame {
    let mut v = json!({
        "viewport": { "halfWidth": 10, "halfHeight": 10, "scaleMode": "fit" },
        "root": {
            "id": "root",
            "fill": "#000000",
            "stroke": "#ffffff",
            "strokeWidth": 1,
            "children": children
        }
    });
    if let Some(bg) = background {
        v["background"] = json!(bg);
    }
    serde_json::from_value(v).unwrap()
}

#[test]
fn shapes_inherit_nearest_material() {
    let f = frame(
        None,
        json!([
            { "type": "circle", "center": { "x": 0, "y": 0 }, "radius": 1 },
            { "type": "material", "id": "red", "ref": "root", "fill": "#ff0000", "children": [
                { "type": "material", "id": "thick", "ref": "red", "strokeWidth": 5, "children": [
                    { "type": "line", "start": { "x": 0, "y": 0 }, "end": { "x": 1, "y": 1 } }
                ]},
                { "type": "rectangle", "center": { "x": 0, "y": 0 }, "width": 1, "height": 1 }
            ]}
        ]),
    );
    let list = build_draw_list(&f).unwrap();
    assert_eq!(list.clear, None);

    let kinds: Vec<_> = list.items.iter().map(|i| i.shape.kind()).collect();
    assert_eq!(kinds, ["circle", "line", "rectangle"]);

    assert_eq!(
        list.items[0].material,
        ResolvedMaterial::new("#000000", "#ffffff", 1.0)
    );
    assert_eq!(
        list.items[1].material,
        ResolvedMaterial::new("#ff0000", "#ffffff", 5.0)
    );
    assert_eq!(
        list.items[2].material,
        ResolvedMaterial::new("#ff0000", "#ffffff", 1.0)
    );
}

#[test]
fn transforms_compose_outer_first() {
    let f = frame(
        Some("#00000080"),
        json!([
            { "type": "transform", "matrix": [1, 0, 0, 1, 10, 0], "children": [
                { "type": "transform", "matrix": [2, 0, 0, 2, 0, 0], "children": [
                    { "type": "circle", "center": { "x": 1, "y": 1 }, "radius": 1 }
                ]}
            ]}
        ]),
    );
    let list = build_draw_list(&f).unwrap();
    assert_eq!(list.clear.map(|c| c.a), Some(128));

    let item = &list.items[0];
    // Scale first, then translate.
    assert_eq!(item.transform * Point::new(1.0, 1.0), Point::new(12.0, 2.0));
}

#[test]
fn transforms_do_not_leak_to_siblings() {
    let f = frame(
        None,
        json!([
            { "type": "transform", "matrix": [1, 0, 0, 1, 5, 5], "children": [] },
            { "type": "circle", "center": { "x": 0, "y": 0 }, "radius": 1 }
        ]),
    );
    let list = build_draw_list(&f).unwrap();
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.items[0].transform, Affine::IDENTITY);
}

#[test]
fn unresolved_embeds_are_refused() {
    let frag = json!({ "root": { "id": "a", "children": [
        { "type": "circle", "center": { "x": 0, "y": 0 }, "radius": 1 }
    ]}});
    let f = frame(
        None,
        json!([{ "type": "embed", "namespace": "e", "rootMaterialId": "root", "fragment": frag }]),
    );
    assert!(matches!(
        build_draw_list(&f),
        Err(SceneLinkError::InvalidInput(_))
    ));

    let list = build_draw_list(&resolve_frame(&f).unwrap()).unwrap();
    assert_eq!(list.items.len(), 1);
}

#[test]
fn invalid_frames_are_refused() {
    let f = frame(None, json!([{ "type": "material", "id": "x", "ref": "nope" }]));
    assert!(matches!(
        build_draw_list(&f),
        Err(SceneLinkError::Validation(_))
    ));

    let f = frame(Some("not-a-color"), json!([]));
    assert!(matches!(
        build_draw_list(&f),
        Err(SceneLinkError::InvalidInput(_))
    ));
}
