use serde_json::{Map, Value};

use crate::db::{ComponentKind, DbComponentTemplate};
use crate::import::error::ImportError;
use crate::inventory::InventoryManager;

/// Fields stripped from raw items before construction, per component kind.
///
/// Power-over-Ethernet fields on interfaces are presentation-only in the
/// source format; the target schema has no home for them. Additive: new
/// kinds get an entry here, not a conditional.
const STRIP_FIELDS: &[(ComponentKind, &[&str])] =
    &[(ComponentKind::Interfaces, &["poe_mode", "poe_type"])];

fn stripped_fields(kind: ComponentKind) -> &'static [&'static str] {
    STRIP_FIELDS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, fields)| *fields)
        .unwrap_or(&[])
}

/// Service responsible for turning one kind's raw item list into persisted
/// component templates.
///
/// All items for a kind are constructed first, then inserted in a single
/// transaction: all-or-nothing for the kind's list, independent of other
/// kinds.
pub struct ComponentMaterializer<'a> {
    inventory: &'a InventoryManager,
}

impl<'a> ComponentMaterializer<'a> {
    pub fn new(inventory: &'a InventoryManager) -> Self {
        ComponentMaterializer { inventory }
    }

    /// Build and bulk-persist the templates for one kind.
    ///
    /// Returns the number of templates created, for logging.
    pub async fn materialize(
        &self,
        kind: ComponentKind,
        items: &[Value],
        device_type_id: &str,
    ) -> Result<usize, ImportError> {
        let mut templates = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            templates.push(build_template(kind, item, position, device_type_id)?);
        }

        self.inventory.add_component_templates(&templates).await?;
        Ok(templates.len())
    }
}

fn build_template(
    kind: ComponentKind,
    item: &Value,
    position: usize,
    device_type_id: &str,
) -> Result<DbComponentTemplate, ImportError> {
    let Some(raw) = item.as_object() else {
        return Err(ImportError::Validation(format!(
            "{} item {} is not a mapping",
            kind.key(),
            position
        )));
    };

    let mut fields = raw.clone();
    for name in stripped_fields(kind) {
        fields.remove(*name);
    }

    let name = take_string(&mut fields, "name", kind, position)?.ok_or_else(|| {
        ImportError::Validation(format!("{} item {} has no name", kind.key(), position))
    })?;
    let label = take_string(&mut fields, "label", kind, position)?;
    let port_type = take_string(&mut fields, "type", kind, position)?;

    Ok(DbComponentTemplate::new(
        device_type_id,
        kind,
        &name,
        label,
        port_type,
        position as i64,
        fields,
    ))
}

fn take_string(
    fields: &mut Map<String, Value>,
    key: &str,
    kind: ComponentKind,
    position: usize,
) -> Result<Option<String>, ImportError> {
    match fields.remove(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(ImportError::Validation(format!(
            "{} item {}: field `{}` must be a string, got {}",
            kind.key(),
            position,
            key,
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_table_only_covers_interfaces() {
        assert_eq!(
            stripped_fields(ComponentKind::Interfaces).to_vec(),
            vec!["poe_mode", "poe_type"]
        );
        assert!(stripped_fields(ComponentKind::PowerPorts).is_empty());
        assert!(stripped_fields(ComponentKind::DeviceBays).is_empty());
    }

    #[test]
    fn test_poe_fields_are_stripped() {
        let item = json!({
            "name": "ethernet1/1",
            "type": "1000base-t",
            "poe_mode": "pd",
            "poe_type": "type2-ieee802.3at",
            "mgmt_only": false,
        });

        let template = build_template(ComponentKind::Interfaces, &item, 0, "dt-1").unwrap();
        assert_eq!(template.name, "ethernet1/1");
        assert_eq!(template.port_type.as_deref(), Some("1000base-t"));
        assert!(!template.attrs.contains_key("poe_mode"));
        assert!(!template.attrs.contains_key("poe_type"));
        assert_eq!(template.attrs.get("mgmt_only"), Some(&json!(false)));
    }

    #[test]
    fn test_item_without_name_is_rejected() {
        let item = json!({"type": "iec-60320-c14"});
        let err = build_template(ComponentKind::PowerPorts, &item, 3, "dt-1").unwrap_err();
        assert!(matches!(err, ImportError::Validation(_)));
    }

    #[test]
    fn test_non_mapping_item_is_rejected() {
        let err =
            build_template(ComponentKind::ConsolePorts, &json!("console0"), 0, "dt-1").unwrap_err();
        assert!(matches!(err, ImportError::Validation(_)));
    }
}
