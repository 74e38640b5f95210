//! 会计系统代码表 (票据类型 / 省份 / 增值税身份)

/// 省份未匹配
pub const UNKNOWN_PROVINCE: &str = "000";

/// 增值税身份未匹配时按一般纳税人处理
pub const DEFAULT_TAX_STATUS: &str = "1";

/// 大写、去首尾空白、去重音
fn normalize(name: &str) -> String {
    name.trim()
        .to_uppercase()
        .chars()
        .map(|c| match c {
            'Á' => 'A',
            'É' => 'E',
            'Í' => 'I',
            'Ó' => 'O',
            'Ú' | 'Ü' => 'U',
            other => other,
        })
        .collect()
}

/// 票据类型 → `FC` / `NC` / `ND` / `OP`
pub fn voucher_type(kind: &str) -> &'static str {
    if kind.is_empty() {
        return "FC";
    }
    let t = kind.to_uppercase();
    if t.contains("FACTURA") {
        "FC"
    } else if t.contains("NC") || t.contains("CRÉDITO") || t.contains("CREDITO") {
        "NC"
    } else if t.contains("ND") || t.contains("DÉBITO") || t.contains("DEBITO") {
        "ND"
    } else if t.contains("ORDEN DE PAGO") || t.contains("OP") {
        "OP"
    } else {
        "FC"
    }
}

/// 省份名称 → 三位代码
pub fn province(name: &str) -> &'static str {
    match normalize(name).as_str() {
        "CAPITAL FEDERAL" | "CABA" | "CIUDAD AUTONOMA DE BUENOS AIRES" => "001",
        "BUENOS AIRES" => "002",
        "CATAMARCA" => "003",
        "CORDOBA" => "004",
        "CORRIENTES" => "005",
        "CHACO" => "006",
        "CHUBUT" => "007",
        "ENTRE RIOS" => "008",
        "FORMOSA" => "009",
        "JUJUY" => "010",
        "LA PAMPA" => "011",
        "LA RIOJA" => "012",
        "MENDOZA" => "013",
        "MISIONES" => "014",
        "NEUQUEN" => "015",
        "RIO NEGRO" => "016",
        "SALTA" => "017",
        "SAN JUAN" => "018",
        "SAN LUIS" => "019",
        "SANTA CRUZ" => "020",
        "SANTA FE" => "021",
        "SANTIAGO DEL ESTERO" => "022",
        "TIERRA DEL FUEGO" => "023",
        "TUCUMAN" => "024",
        "EXTERIOR" => "025",
        _ => UNKNOWN_PROVINCE,
    }
}

/// 增值税身份描述 → 一位代码
pub fn tax_status(description: &str) -> &'static str {
    match normalize(description).as_str() {
        "IVA RESPONSABLE INSCRIPTO" | "RESPONSABLE INSCRIPTO" | "RESPONSABLE INSCRIPTO." => "1",
        "RESPONSABLE MONOTRIBUTO" | "MONOTRIBUTO" | "MONOTRIBUTO SOCIAL" => "6",
        "CONSUMIDOR FINAL" => "3",
        "EXENTO" => "5",
        "NO RESPONSABLE" => "4",
        "SUJETO NO CATEGORIZADO" => "7",
        _ => DEFAULT_TAX_STATUS,
    }
}
