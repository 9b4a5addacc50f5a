//! Column types and their typed option payloads
//!
//! Options are stored as a JSON string in `v_columns.options`. The pair
//! [`ColumnOptions::to_stored`] / [`ColumnOptions::from_stored`] is the only
//! place that crosses between the stored text and the typed value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use super::entities::vcolumns;
use crate::errors::{VTableError, VTableResult};

/// How a cell's string value is interpreted by the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
    Boolean,
    Date,
    Select,
    Relation,
}

impl ColumnType {
    pub const ALL: [ColumnType; 6] = [
        ColumnType::Text,
        ColumnType::Number,
        ColumnType::Boolean,
        ColumnType::Date,
        ColumnType::Select,
        ColumnType::Relation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::Select => "select",
            ColumnType::Relation => "relation",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = VTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| VTableError::InvalidInput(format!("unknown column type '{}'", s)))
    }
}

impl From<ColumnType> for String {
    fn from(column_type: ColumnType) -> Self {
        column_type.as_str().to_string()
    }
}

/// Per-type column settings, tagged by the column type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnOptions {
    Text {},
    Number {},
    Boolean {},
    Date {},
    Select {
        // Older payloads call the choice list `options`
        #[serde(default, alias = "options")]
        choices: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
    Relation {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        table_id: Option<i32>,
    },
}

impl ColumnOptions {
    /// Options carrying no settings for the given type
    pub fn empty(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Text => ColumnOptions::Text {},
            ColumnType::Number => ColumnOptions::Number {},
            ColumnType::Boolean => ColumnOptions::Boolean {},
            ColumnType::Date => ColumnOptions::Date {},
            ColumnType::Select => ColumnOptions::Select {
                choices: Vec::new(),
                default: None,
            },
            ColumnType::Relation => ColumnOptions::Relation { table_id: None },
        }
    }

    pub fn select(choices: &[&str], default: Option<&str>) -> Self {
        ColumnOptions::Select {
            choices: choices.iter().map(|c| c.to_string()).collect(),
            default: default.map(str::to_string),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnOptions::Text {} => ColumnType::Text,
            ColumnOptions::Number {} => ColumnType::Number,
            ColumnOptions::Boolean {} => ColumnType::Boolean,
            ColumnOptions::Date {} => ColumnType::Date,
            ColumnOptions::Select { .. } => ColumnType::Select,
            ColumnOptions::Relation { .. } => ColumnType::Relation,
        }
    }

    /// Value a freshly synthesised cell receives for this column.
    /// Only select columns carry a default; every other type starts empty.
    pub fn default_value(&self) -> Option<String> {
        match self {
            ColumnOptions::Select { default, .. } => default.clone(),
            _ => None,
        }
    }

    pub fn to_stored(&self) -> VTableResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse stored options for a column of `column_type`.
    ///
    /// Reads never fail: an unreadable payload is logged and treated as empty,
    /// so one bad row cannot break table assembly.
    pub fn from_stored(column_type: ColumnType, stored: &str) -> Self {
        let trimmed = stored.trim();
        if trimmed.is_empty() {
            return Self::empty(column_type);
        }

        let parsed = serde_json::from_str::<Value>(trimmed)
            .map_err(|e| e.to_string())
            .and_then(|value| Self::from_value(column_type, value));

        match parsed {
            Ok(options) => options,
            Err(reason) => {
                warn!(
                    "Discarding unreadable {} column options {:?}: {}",
                    column_type, stored, reason
                );
                Self::empty(column_type)
            }
        }
    }

    /// Parse caller-supplied options for a column of `column_type`.
    ///
    /// The `type` tag may be omitted; when present it must agree with the
    /// column type.
    pub fn from_input(column_type: ColumnType, value: Value) -> VTableResult<Self> {
        let options =
            Self::from_value(column_type, value).map_err(VTableError::InvalidOptions)?;

        if let ColumnOptions::Select {
            choices,
            default: Some(default),
        } = &options
        {
            if !choices.is_empty() && !choices.contains(default) {
                return Err(VTableError::InvalidOptions(format!(
                    "default '{}' is not one of the select choices",
                    default
                )));
            }
        }

        Ok(options)
    }

    fn from_value(column_type: ColumnType, value: Value) -> Result<Self, String> {
        // Already-serialised payloads hold the JSON object as a string
        let value: Value = match value {
            Value::String(inner) => serde_json::from_str(&inner).map_err(|e| e.to_string())?,
            other => other,
        };

        let mut map = match value {
            Value::Null => return Ok(Self::empty(column_type)),
            Value::Object(map) => map,
            other => return Err(format!("expected an object, found {}", other)),
        };

        map.entry("type")
            .or_insert_with(|| Value::String(column_type.as_str().to_string()));

        let options: ColumnOptions =
            serde_json::from_value(Value::Object(map)).map_err(|e| e.to_string())?;

        if options.column_type() != column_type {
            return Err(format!(
                "options tagged '{}' do not fit a {} column",
                options.column_type(),
                column_type
            ));
        }

        Ok(options)
    }
}

/// A column as seen above the storage boundary, with parsed options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VColumn {
    pub id: i32,
    pub table_id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub options: ColumnOptions,
    pub created_at: DateTime<Utc>,
}

impl VColumn {
    pub fn default_value(&self) -> Option<String> {
        self.options.default_value()
    }
}

impl TryFrom<vcolumns::Model> for VColumn {
    type Error = VTableError;

    fn try_from(model: vcolumns::Model) -> Result<Self, Self::Error> {
        let column_type = model.column_type.parse::<ColumnType>().map_err(|_| {
            sea_orm::DbErr::Type(format!(
                "column {} has unknown type '{}'",
                model.id, model.column_type
            ))
        })?;

        Ok(Self {
            id: model.id,
            table_id: model.table_id,
            name: model.name,
            column_type,
            options: ColumnOptions::from_stored(column_type, &model.options),
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_type_round_trip() {
        for ty in ColumnType::ALL {
            assert_eq!(ty.as_str().parse::<ColumnType>().unwrap(), ty);
        }
        assert!("formula".parse::<ColumnType>().is_err());
    }

    #[test]
    fn test_select_default_is_derived() {
        let options = ColumnOptions::select(&["Low", "Medium", "High"], Some("Medium"));
        assert_eq!(options.default_value(), Some("Medium".to_string()));

        let no_default = ColumnOptions::select(&["Low"], None);
        assert_eq!(no_default.default_value(), None);
    }

    #[test]
    fn test_non_select_types_have_no_default() {
        // A stray default on a text column is ignored
        let options = ColumnOptions::from_stored(ColumnType::Text, r#"{"default":"x"}"#);
        assert_eq!(options, ColumnOptions::Text {});
        assert_eq!(options.default_value(), None);
    }

    #[test]
    fn test_from_stored_accepts_legacy_select_payload() {
        let stored = r#"{"options":["To Do","In Progress","Done"],"default":"To Do"}"#;
        let options = ColumnOptions::from_stored(ColumnType::Select, stored);
        assert_eq!(
            options,
            ColumnOptions::select(&["To Do", "In Progress", "Done"], Some("To Do"))
        );
    }

    #[test]
    fn test_from_stored_unwraps_double_encoded_payload() {
        let stored = serde_json::to_string(r#"{"choices":["A"],"default":"A"}"#).unwrap();
        let options = ColumnOptions::from_stored(ColumnType::Select, &stored);
        assert_eq!(options.default_value(), Some("A".to_string()));
    }

    #[test]
    fn test_from_stored_degrades_to_empty() {
        assert_eq!(
            ColumnOptions::from_stored(ColumnType::Select, "not json"),
            ColumnOptions::empty(ColumnType::Select)
        );
        assert_eq!(
            ColumnOptions::from_stored(ColumnType::Date, ""),
            ColumnOptions::Date {}
        );
        assert_eq!(
            ColumnOptions::from_stored(ColumnType::Number, "{}"),
            ColumnOptions::Number {}
        );
        // Tag left over from a previous column type
        assert_eq!(
            ColumnOptions::from_stored(ColumnType::Text, r#"{"type":"select","choices":[]}"#),
            ColumnOptions::Text {}
        );
    }

    #[test]
    fn test_stored_form_round_trips() {
        let options = ColumnOptions::select(&["Low", "High"], Some("Low"));
        let stored = options.to_stored().unwrap();
        assert_eq!(ColumnOptions::from_stored(ColumnType::Select, &stored), options);
    }

    #[test]
    fn test_from_input_rejects_mismatched_payloads() {
        let err = ColumnOptions::from_input(ColumnType::Select, json!({"choices": "Low"}))
            .unwrap_err();
        assert!(err.is_client_error());

        let err = ColumnOptions::from_input(ColumnType::Text, json!({"type": "select"}))
            .unwrap_err();
        assert!(matches!(err, VTableError::InvalidOptions(_)));

        let err = ColumnOptions::from_input(ColumnType::Select, json!(["Low"])).unwrap_err();
        assert!(matches!(err, VTableError::InvalidOptions(_)));
    }

    #[test]
    fn test_from_input_checks_select_default() {
        let err = ColumnOptions::from_input(
            ColumnType::Select,
            json!({"choices": ["Low", "High"], "default": "Medium"}),
        )
        .unwrap_err();
        assert!(matches!(err, VTableError::InvalidOptions(_)));

        let ok = ColumnOptions::from_input(
            ColumnType::Select,
            json!({"choices": ["Low", "High"], "default": "High"}),
        )
        .unwrap();
        assert_eq!(ok.default_value(), Some("High".to_string()));
    }

    #[test]
    fn test_from_input_accepts_serialised_object() {
        let options = ColumnOptions::from_input(
            ColumnType::Select,
            Value::String(r#"{"choices":["Low","High"],"default":"Low"}"#.to_string()),
        )
        .unwrap();
        assert_eq!(options, ColumnOptions::select(&["Low", "High"], Some("Low")));
    }

    #[test]
    fn test_from_input_null_is_empty() {
        assert_eq!(
            ColumnOptions::from_input(ColumnType::Relation, Value::Null).unwrap(),
            ColumnOptions::Relation { table_id: None }
        );
    }
}
