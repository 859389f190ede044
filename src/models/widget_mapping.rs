use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetHeaderLink {
    #[serde(alias = "name")]
    pub title: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetPermission {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfiguration {
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_link: Option<WidgetHeaderLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<WidgetPermission>>,
}

/// Default grid size of a freshly placed widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetBaseDimensions {
    #[serde(rename = "w", default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(rename = "h", default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(rename = "maxH", default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u32>,
    #[serde(rename = "minH", default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,
}

/// How the front-end loads one widget module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetModuleFederationMetadata {
    pub scope: String,
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_flag: Option<String>,
    pub config: WidgetConfiguration,
    #[serde(default)]
    pub defaults: WidgetBaseDimensions,
}

impl WidgetModuleFederationMetadata {
    /// `scope-module`, suffixed with `-importName` when one is set.
    ///
    /// A module cannot be exposed twice with the same scope, module and
    /// import name, so the key identifies the mapping.
    pub fn widget_key(&self) -> String {
        match self.import_name.as_deref() {
            Some(import) if !import.is_empty() => {
                format!("{}-{}-{}", self.scope, self.module, import)
            }
            _ => format!("{}-{}", self.scope, self.module),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(import_name: Option<&str>) -> WidgetModuleFederationMetadata {
        WidgetModuleFederationMetadata {
            scope: "scope1".into(),
            module: "module1".into(),
            import_name: import_name.map(str::to_string),
            feature_flag: None,
            config: WidgetConfiguration {
                title: "Widget".into(),
                icon: "icon".into(),
                header_link: None,
                permissions: None,
            },
            defaults: WidgetBaseDimensions::default(),
        }
    }

    #[test]
    fn key_without_import_name() {
        assert_eq!(mapping(None).widget_key(), "scope1-module1");
    }

    #[test]
    fn empty_import_name_is_ignored() {
        assert_eq!(mapping(Some("")).widget_key(), "scope1-module1");
    }

    #[test]
    fn key_with_import_name() {
        assert_eq!(
            mapping(Some("ImportedComponent")).widget_key(),
            "scope1-module1-ImportedComponent"
        );
    }

    #[test]
    fn parses_full_mapping() {
        let m: WidgetModuleFederationMetadata = serde_json::from_value(json!({
            "scope": "advanced",
            "module": "complex-widget",
            "importName": "CustomComponent",
            "featureFlag": "enable-advanced-widgets",
            "config": {
                "title": "Advanced Widget",
                "icon": "advanced-icon",
                "headerLink": {"name": "View Details", "href": "/insights/dashboard"},
                "permissions": [{"method": "isOrgAdmin"}]
            },
            "defaults": {"w": 3, "h": 4, "maxH": 8, "minH": 2}
        }))
        .unwrap();

        assert_eq!(m.widget_key(), "advanced-complex-widget-CustomComponent");
        assert_eq!(m.feature_flag.as_deref(), Some("enable-advanced-widgets"));
        let link = m.config.header_link.as_ref().unwrap();
        assert_eq!(link.title, "View Details");
        assert_eq!(m.config.permissions.as_ref().unwrap()[0].method, "isOrgAdmin");
        assert_eq!(m.defaults.width, Some(3));
        assert_eq!(m.defaults.min_height, Some(2));
    }
}
