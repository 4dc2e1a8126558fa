use super::*;

#[test]
fn test_new_definition_defaults() {
    let def = ToolDefinition::new("order_cancel", "Cancel Order", "Discard the pending order");
    assert_eq!(def.id, "order_cancel");
    assert_eq!(def.risk_level, RiskLevel::Low);
    assert!(def.parameters_schema.is_none());
}

#[test]
fn test_with_parameters_schema() {
    let schema = serde_json::json!({"type": "object", "properties": {"name": {"type": "string"}}});
    let def = ToolDefinition::new("order_add_favorite", "Add Favorite", "Save a named order")
        .with_parameters_schema(schema.clone());
    assert_eq!(def.parameters_schema, Some(schema));
}

#[test]
fn test_with_risk_level() {
    let def = ToolDefinition::new("order_confirm", "Confirm Order", "Place the pending order")
        .with_risk_level(RiskLevel::High);
    assert_eq!(def.risk_level, RiskLevel::High);
}

#[test]
fn test_describe_uses_empty_schema_when_unset() {
    let def = ToolDefinition::new("order_check_auth", "Check Auth", "Report sign-in state");
    let desc = def.describe();
    assert_eq!(desc["name"], "order_check_auth");
    assert_eq!(desc["input_schema"]["type"], "object");
}

#[test]
fn test_serde_skips_absent_schema() {
    let def = ToolDefinition::new("order_login", "Login", "Open an interactive sign-in");
    let value = serde_json::to_value(&def).unwrap();
    assert!(value.get("parameters_schema").is_none());
}
