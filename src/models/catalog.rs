//! Catálogo de ítems de checklist
//!
//! Configuración estática de los seis aspectos inspeccionables de un
//! vehículo, sus valores posibles y qué valores cuentan como defecto.
//! No se persiste: es la única fuente de verdad para clasificar los
//! valores crudos guardados en `DailyChecklist.items`.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::utils::errors::AppError;

/// Una opción seleccionable para un ítem del checklist
#[derive(Debug, Clone)]
pub struct ChecklistItemOption {
    pub value: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

/// Un aspecto inspeccionable del vehículo
#[derive(Debug, Clone)]
pub struct ChecklistItem {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub options: Vec<ChecklistItemOption>,
    problem_values: Vec<&'static str>,
}

impl ChecklistItem {
    /// Clasifica un valor crudo como defecto o no.
    /// Valores desconocidos no se consideran defecto.
    pub fn is_problem(&self, value: &str) -> bool {
        self.problem_values.contains(&value)
    }

    /// Etiqueta legible de un valor crudo, si existe
    pub fn label_for(&self, value: &str) -> Option<&'static str> {
        self.options.iter().find(|o| o.value == value).map(|o| o.label)
    }
}

fn option(value: &'static str, label: &'static str, color: &'static str) -> ChecklistItemOption {
    ChecklistItemOption { value, label, color }
}

lazy_static! {
    static ref CATALOG: Vec<ChecklistItem> = vec![
        ChecklistItem {
            key: "fuel_level",
            title: "Nivel de combustible",
            description: "Nivel del tanque al momento de la inspección",
            options: vec![
                option("lleno", "Lleno", "green"),
                option("tres_cuartos", "3/4 de tanque", "green"),
                option("medio", "Medio tanque", "yellow"),
                option("cuarto", "1/4 de tanque", "orange"),
                option("vacio", "Vacío / reserva", "red"),
            ],
            problem_values: vec!["vacio"],
        },
        ChecklistItem {
            key: "tire_pressure",
            title: "Presión de neumáticos",
            description: "Presión de las cuatro ruedas y la de repuesto",
            options: vec![
                option("correcta", "Correcta", "green"),
                option("baja", "Baja", "orange"),
                option("muy_baja", "Muy baja / pinchazo", "red"),
            ],
            problem_values: vec!["baja", "muy_baja"],
        },
        ChecklistItem {
            key: "tire_condition",
            title: "Estado de neumáticos",
            description: "Desgaste y daños visibles en la banda de rodadura",
            options: vec![
                option("bueno", "Bueno", "green"),
                option("desgastado", "Desgastado", "yellow"),
                option("critico", "Crítico", "red"),
            ],
            problem_values: vec!["critico"],
        },
        ChecklistItem {
            key: "lights",
            title: "Luces",
            description: "Faros, direccionales, luces de freno y de reversa",
            options: vec![
                option("funcionando", "Todas funcionando", "green"),
                option("alguna_quemada", "Alguna quemada", "orange"),
                option("sin_funcionar", "Sin funcionar", "red"),
            ],
            problem_values: vec!["alguna_quemada", "sin_funcionar"],
        },
        ChecklistItem {
            key: "fluids",
            title: "Niveles de fluidos",
            description: "Aceite, refrigerante y líquido de frenos",
            options: vec![
                option("correctos", "Correctos", "green"),
                option("bajos", "Bajos", "yellow"),
                option("criticos", "Críticos", "red"),
            ],
            problem_values: vec!["criticos"],
        },
        ChecklistItem {
            key: "documentation",
            title: "Documentación",
            description: "Tarjeta de circulación, seguro y permisos vigentes",
            options: vec![
                option("al_dia", "Al día", "green"),
                option("por_vencer", "Por vencer", "yellow"),
                option("vencida", "Vencida", "red"),
            ],
            problem_values: vec!["vencida"],
        },
    ];
}

/// Todos los ítems del catálogo
pub fn items() -> &'static [ChecklistItem] {
    &CATALOG
}

/// Buscar un ítem por clave
pub fn find(key: &str) -> Option<&'static ChecklistItem> {
    CATALOG.iter().find(|item| item.key == key)
}

/// Clasifica el valor de un ítem. Falla si la clave no existe en el catálogo.
pub fn is_problem(key: &str, value: &str) -> Result<bool, AppError> {
    let item = find(key)
        .ok_or_else(|| AppError::BadRequest(format!("Ítem de checklist desconocido: '{}'", key)))?;
    Ok(item.is_problem(value))
}

/// Verifica si algún ítem del mapa tiene un valor clasificado como defecto.
/// Falla ante la primera clave desconocida, antes de cualquier escritura.
pub fn has_problems(values: &HashMap<String, String>) -> Result<bool, AppError> {
    let mut any_problem = false;
    for (key, value) in values {
        if is_problem(key, value)? {
            any_problem = true;
        }
    }
    Ok(any_problem)
}

/// Ítems del mapa clasificados como defecto, con su etiqueta legible.
/// Claves desconocidas se omiten (pensado para datos ya persistidos).
pub fn problem_entries(values: &HashMap<String, String>) -> Vec<(&'static ChecklistItem, String)> {
    let mut entries: Vec<(&'static ChecklistItem, String)> = values
        .iter()
        .filter_map(|(key, value)| {
            let item = find(key)?;
            if item.is_problem(value) {
                let label = item
                    .label_for(value)
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| value.clone());
                Some((item, label))
            } else {
                None
            }
        })
        .collect();
    entries.sort_by_key(|(item, _)| item.key);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_six_items() {
        assert_eq!(items().len(), 6);
    }

    #[test]
    fn test_fuel_empty_is_problem() {
        assert!(is_problem("fuel_level", "vacio").unwrap());
        assert!(!is_problem("fuel_level", "lleno").unwrap());
        assert!(!is_problem("fuel_level", "medio").unwrap());
    }

    #[test]
    fn test_unknown_key_fails() {
        assert!(is_problem("motor_warp", "ok").is_err());
    }

    #[test]
    fn test_unknown_value_is_not_problem() {
        assert!(!is_problem("lights", "valor_inventado").unwrap());
    }

    #[test]
    fn test_has_problems() {
        let mut values = HashMap::new();
        values.insert("fuel_level".to_string(), "lleno".to_string());
        values.insert("lights".to_string(), "funcionando".to_string());
        assert!(!has_problems(&values).unwrap());

        values.insert("tire_pressure".to_string(), "baja".to_string());
        assert!(has_problems(&values).unwrap());
    }

    #[test]
    fn test_has_problems_rejects_unknown_key() {
        let mut values = HashMap::new();
        values.insert("frenos_magicos".to_string(), "ok".to_string());
        assert!(has_problems(&values).is_err());
    }

    #[test]
    fn test_problem_entries_resolves_labels() {
        let mut values = HashMap::new();
        values.insert("fuel_level".to_string(), "vacio".to_string());
        values.insert("fluids".to_string(), "correctos".to_string());

        let entries = problem_entries(&values);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0.key, "fuel_level");
        assert_eq!(entries[0].1, "Vacío / reserva");
    }
}
