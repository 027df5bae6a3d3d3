use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::model::ProfileDefinition;

/// Emit the JSON Schema for custom profile definitions.
pub fn profile_json_schema() -> RootSchema {
    schema_for!(ProfileDefinition)
}
