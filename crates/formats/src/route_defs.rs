use serde::Deserialize;
use serde_json::Value;

/// One curated route as authored in the routes file.
///
/// Either a single route (`name` plus optional bounds) or a multi-segment
/// route listed under `routes`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub mp_min: Option<f64>,
    #[serde(default)]
    pub mp_max: Option<f64>,
    #[serde(default)]
    pub routes: Vec<SubRouteDef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubRouteDef {
    pub name: String,
    #[serde(default)]
    pub mp_min: Option<f64>,
    #[serde(default)]
    pub mp_max: Option<f64>,
}

impl RouteDef {
    /// Label for menus: `displayName`, then `name`.
    pub fn label(&self) -> Option<&str> {
        self.display_name.as_deref().or(self.name.as_deref())
    }

    pub fn is_multi_segment(&self) -> bool {
        !self.routes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteDefsError {
    Json(String),
    /// Neither an array of routes nor `{ "routes": [...] }`.
    UnrecognizedShape,
}

impl std::fmt::Display for RouteDefsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteDefsError::Json(msg) => write!(f, "routes file parse error: {msg}"),
            RouteDefsError::UnrecognizedShape => {
                write!(f, "expected an array of routes or {{\"routes\": [...]}}")
            }
        }
    }
}

impl std::error::Error for RouteDefsError {}

pub fn parse_route_defs(payload: &str) -> Result<Vec<RouteDef>, RouteDefsError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| RouteDefsError::Json(e.to_string()))?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("routes") {
            Some(Value::Array(items)) => items,
            _ => return Err(RouteDefsError::UnrecognizedShape),
        },
        _ => return Err(RouteDefsError::UnrecognizedShape),
    };
    serde_json::from_value(Value::Array(items)).map_err(|e| RouteDefsError::Json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{RouteDefsError, parse_route_defs};

    #[test]
    fn parses_routes_fixture() {
        let defs = parse_route_defs(include_str!("../fixtures/routes.json")).expect("parse");
        assert_eq!(defs.len(), 4);
        assert_eq!(defs[0].label(), Some("I-84 (Weber Canyon)"));
        assert_eq!(defs[0].mp_min, Some(81.0));
        assert!(!defs[0].is_multi_segment());
        assert!(defs[2].is_multi_segment());
        assert_eq!(defs[2].routes[1].mp_max, Some(90.0));
        assert_eq!(defs[3].name, None);
    }

    #[test]
    fn accepts_wrapped_form() {
        let defs = parse_route_defs(r#"{"routes":[{"name":"0089P"}]}"#).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].label(), Some("0089P"));
        assert_eq!(
            parse_route_defs(r#"{"items":[]}"#).unwrap_err(),
            RouteDefsError::UnrecognizedShape
        );
    }
}
