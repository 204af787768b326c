/// Maps raw unit spellings from datasheets to their canonical display
/// form. Presentation aid only: cell rendering and difference detection
/// always use the raw unit text.
pub fn standardize_unit(unit: &str) -> String {
    // 溫度單位可能帶修飾字，例如 "Max. °C"
    if unit.contains('°') {
        if unit.contains("°C") {
            return "°C".to_string();
        }
        if unit.contains("°F") {
            return "°F".to_string();
        }
    }

    if unit.to_lowercase().starts_with("ohm") {
        return "Ω".to_string();
    }

    unit.to_string()
}
