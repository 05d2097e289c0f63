use super::*;

const MINIMAL: &str = r#"{
    "document": {
        "viewport": {"width": 1000, "height": 800},
        "document": {"width": 1000, "height": 4000}
    }
}"#;

#[test]
fn minimal_scenario_uses_defaults() {
    let s = Scenario::from_json_str(MINIMAL).unwrap();
    assert_eq!(s.config, RevealConfig::default());
    assert!(s.document.nodes.is_empty());
    assert!(s.steps.is_empty());
}

#[test]
fn steps_parse_by_op_tag() {
    let json = r#"{
        "document": {
            "viewport": {"width": 1000, "height": 800},
            "document": {"width": 1000, "height": 4000}
        },
        "steps": [
            {"op": "scroll", "y": 120},
            {"op": "scroll", "target": "pane", "x": 5},
            {"op": "resize_viewport", "size": {"width": 400, "height": 600}},
            {"op": "set_offset", "node": "hdr", "edge": "bottom", "value": "4px"},
            {"op": "set_offset", "node": "hdr", "edge": "top"},
            {"op": "set_class", "node": "hdr", "class": "sticky-reveal", "present": false},
            {"op": "detach", "node": "hdr"}
        ]
    }"#;
    let s = Scenario::from_json_str(json).unwrap();
    assert_eq!(s.steps.len(), 7);
    assert_eq!(
        s.steps[0],
        Step::Scroll {
            target: None,
            x: None,
            y: Some(120.0)
        }
    );
    assert_eq!(
        s.steps[4],
        Step::SetOffset {
            node: "hdr".to_string(),
            edge: Edge::Top,
            value: None
        }
    );
}

#[test]
fn unknown_op_is_a_serde_error() {
    let json = r#"{
        "document": {
            "viewport": {"width": 1000, "height": 800},
            "document": {"width": 1000, "height": 4000}
        },
        "steps": [{"op": "teleport"}]
    }"#;
    let err = Scenario::from_json_str(json).unwrap_err();
    assert!(matches!(err, RevealError::Serde(_)));
}

#[test]
fn degenerate_viewport_is_rejected() {
    let json = r#"{
        "document": {
            "viewport": {"width": 0, "height": 800},
            "document": {"width": 1000, "height": 4000}
        }
    }"#;
    let err = Scenario::from_json_str(json).unwrap_err();
    assert!(matches!(err, RevealError::Validation(_)));
}

#[test]
fn bad_config_is_rejected() {
    let json = r#"{
        "config": {"epsilon": -1},
        "document": {
            "viewport": {"width": 1000, "height": 800},
            "document": {"width": 1000, "height": 4000}
        }
    }"#;
    assert!(matches!(
        Scenario::from_json_str(json).unwrap_err(),
        RevealError::Validation(_)
    ));
}

#[test]
fn missing_file_is_reported() {
    let err = Scenario::from_path(Path::new("/nonexistent/scenario.json")).unwrap_err();
    assert!(matches!(err, RevealError::Other(_)));
    assert!(err.to_string().contains("read scenario"));
}
