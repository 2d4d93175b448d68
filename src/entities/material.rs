use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Condition tag carried by every material record.
///
/// The set is closed but carries no transition rules: any state may be
/// replaced by any other on update.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialState {
    #[default]
    #[sea_orm(string_value = "GOOD")]
    Good,

    #[sea_orm(string_value = "DAMAGING")]
    Damaging,

    #[sea_orm(string_value = "BAD")]
    Bad,
}

impl MaterialState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialState::Good => "GOOD",
            MaterialState::Damaging => "DAMAGING",
            MaterialState::Bad => "BAD",
        }
    }
}

impl fmt::Display for MaterialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inventory record: a design, its condition and how many units it holds
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "material")]
#[schema(as = Material, example = json!({
    "id": 1,
    "design": "steel-beam",
    "state": "GOOD",
    "quantity": 10
}))]
pub struct Model {
    /// Store-assigned identifier
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Free-text label for the material type
    pub design: String,

    pub state: MaterialState,

    /// Number of units represented by this record
    pub quantity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn state_defaults_to_good() {
        assert_eq!(MaterialState::default(), MaterialState::Good);
    }

    #[test]
    fn state_uses_upper_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&MaterialState::Damaging).unwrap(),
            "\"DAMAGING\""
        );
        let parsed: MaterialState = serde_json::from_str("\"BAD\"").unwrap();
        assert_eq!(parsed, MaterialState::Bad);
        assert!(serde_json::from_str::<MaterialState>("\"broken\"").is_err());
    }

    #[test]
    fn state_column_value_matches_wire_value() {
        for state in MaterialState::iter() {
            assert_eq!(state.to_value(), state.as_str());
        }
    }
}
