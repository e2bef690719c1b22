use super::*;
use serde_json::json;

#[test]
fn node_json_uses_type_tag_and_camel_case() {
    let node: FrameNode = serde_json::from_value(json!({
        "type": "material",
        "id": "child",
        "ref": "frag_root",
        "fill": "#ff0000",
        "strokeWidth": 2,
        "children": [{ "type": "circle", "center": { "x": 0, "y": 0 }, "radius": 5 }]
    }))
    .unwrap();

    let FrameNode::Material(m) = &node else {
        panic!("expected material node");
    };
    assert_eq!(m.id, "child");
    assert_eq!(m.inherits, "frag_root");
    assert_eq!(m.fill.as_deref(), Some("#ff0000"));
    assert_eq!(m.stroke, None);
    assert_eq!(m.stroke_width, Some(2.0));
    assert!(matches!(m.children[0], FrameNode::Circle(_)));

    let back = serde_json::to_value(&node).unwrap();
    assert_eq!(back["ref"], "frag_root");
    assert_eq!(back["strokeWidth"], 2.0);
    assert!(back.get("stroke").is_none());
}

#[test]
fn frame_defaults_background_and_children() {
    let frame: Frame = serde_json::from_value(json!({
        "viewport": { "halfWidth": 10, "halfHeight": 5, "scaleMode": "stretch" },
        "root": { "id": "root", "fill": "#000000", "stroke": "#ffffff", "strokeWidth": 1 }
    }))
    .unwrap();
    assert_eq!(frame.background, None);
    assert_eq!(frame.viewport.scale_mode, ScaleMode::Stretch);
    assert!(frame.root.children.is_empty());
    assert!(!frame.has_embeds());
}

#[test]
fn unknown_scale_mode_is_rejected() {
    let res: Result<Viewport, _> = serde_json::from_value(json!({
        "halfWidth": 1, "halfHeight": 1, "scaleMode": "zoom"
    }));
    assert!(res.is_err());
}

#[test]
fn embed_detection_looks_through_containers() {
    let embed = FrameNode::Embed(Embed {
        namespace: "a".to_owned(),
        root_material_id: "root".to_owned(),
        fragment: Fragment {
            root: RootMaterialRef {
                id: "anchor".to_owned(),
                children: vec![],
            },
        },
    });
    let wrapped = FrameNode::Transform(Transform {
        matrix: vec![1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        children: vec![embed],
    });
    assert!(wrapped.contains_embed());
    assert!(!wrapped.is_shape());

    let circle = FrameNode::from(Circle {
        center: Position::new(0.0, 0.0),
        radius: 1.0,
    });
    assert!(circle.is_shape());
    assert!(!circle.contains_embed());
    assert!(circle.children().is_empty());
}

#[test]
fn transform_affine_requires_six_finite_entries() {
    let t = Transform {
        matrix: vec![2.0, 0.0, 0.0, 2.0, 1.0, 1.0],
        children: vec![],
    };
    assert!(t.affine().is_some());

    let bad = Transform {
        matrix: vec![2.0, 0.0, 0.0],
        children: vec![],
    };
    assert!(bad.affine().is_none());
}
