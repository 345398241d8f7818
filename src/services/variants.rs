use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::{authorize_owner, AuthUser};
use crate::db::DbPool;
use crate::entities::{variant_group, variant_option, Machine, VariantGroup};
use crate::errors::ServiceError;

/// Replace-all management of a machine's variant groups and options.
#[derive(Clone)]
pub struct VariantService {
    db: Arc<DbPool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariantOptionInput {
    #[serde(default)]
    pub name: Option<String>,
    /// Accepts a number or a numeric string; anything else falls back to 0
    #[serde(default)]
    pub price_modifier: Option<Value>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub parameter_overrides: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariantGroupInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub options: Vec<VariantOptionInput>,
}

impl VariantService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Delete every variant group of the machine (options cascade) and
    /// re-insert the supplied set in array order. Groups and options
    /// without a non-empty name are skipped.
    #[instrument(skip(self, groups))]
    pub async fn replace(
        &self,
        user: &AuthUser,
        machine_id: Uuid,
        groups: Vec<VariantGroupInput>,
    ) -> Result<(), ServiceError> {
        let machine = Machine::find_by_id(machine_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Machine {machine_id} not found")))?;

        authorize_owner(user, machine.admin_id)?;

        self.db
            .transaction::<_, (), ServiceError>(move |txn| {
                Box::pin(async move {
                    VariantGroup::delete_many()
                        .filter(variant_group::Column::MachineId.eq(machine_id))
                        .exec(txn)
                        .await?;

                    let mut group_order = 0;
                    for group in groups {
                        let Some(name) = non_empty(group.name) else {
                            continue;
                        };

                        let group_id = Uuid::new_v4();
                        variant_group::ActiveModel {
                            id: Set(group_id),
                            machine_id: Set(machine_id),
                            name: Set(name),
                            sort_order: Set(group_order),
                            created_at: Set(Utc::now()),
                        }
                        .insert(txn)
                        .await?;
                        group_order += 1;

                        let mut option_order = 0;
                        for option in group.options {
                            let Some(option_name) = non_empty(option.name) else {
                                continue;
                            };

                            variant_option::ActiveModel {
                                id: Set(Uuid::new_v4()),
                                group_id: Set(group_id),
                                name: Set(option_name),
                                price_modifier: Set(coerce_modifier(
                                    option.price_modifier.as_ref(),
                                )),
                                is_default: Set(option.is_default),
                                image_url: Set(option.image_url),
                                parameter_overrides: Set(option.parameter_overrides),
                                sort_order: Set(option_order),
                                created_at: Set(Utc::now()),
                            }
                            .insert(txn)
                            .await?;
                            option_order += 1;
                        }
                    }

                    Ok(())
                })
            })
            .await?;

        info!(%machine_id, "replaced variant groups");
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Coerce an incoming modifier to a Decimal, defaulting to 0 on anything
/// that does not parse.
fn coerce_modifier(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string()).unwrap_or(Decimal::ZERO),
        Some(Value::String(s)) => Decimal::from_str(s.trim()).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[rstest]
    #[case(json!(4500), dec!(4500))]
    #[case(json!(-250.5), dec!(-250.5))]
    #[case(json!("1200"), dec!(1200))]
    #[case(json!(" 99.9 "), dec!(99.9))]
    #[case(json!("dorzuc tysiac"), Decimal::ZERO)]
    #[case(json!(null), Decimal::ZERO)]
    #[case(json!({"v": 1}), Decimal::ZERO)]
    fn modifiers_coerce_with_zero_fallback(
        #[case] value: serde_json::Value,
        #[case] expected: Decimal,
    ) {
        assert_eq!(coerce_modifier(Some(&value)), expected);
    }

    #[test]
    fn missing_modifier_defaults_to_zero() {
        assert_eq!(coerce_modifier(None), Decimal::ZERO);
    }

    #[test]
    fn blank_names_are_filtered() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(
            non_empty(Some(" Kabina ".to_string())),
            Some("Kabina".to_string())
        );
    }
}
