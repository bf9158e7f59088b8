use std::fs;

const COLOUR_KEYS: [(&str, &str); 3] = [("links", "color"), ("quote", "fill"), ("rule", "fill")];

fn main() {
    // Validate the bundled config against the schema Config expects, so a bad
    // edit fails the build instead of falling back at runtime.
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={}", config_path);

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");
    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {}", e),
    };

    for (section, key) in COLOUR_KEYS {
        let value = table
            .get(section)
            .and_then(|s| s.get(key))
            .and_then(|v| v.as_str())
            .unwrap_or_else(|| panic!("default_config.toml: missing {}.{}", section, key));
        let hex = value.strip_prefix('#').unwrap_or("");
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            panic!(
                "default_config.toml: {}.{} = {:?} is not #RRGGBB",
                section, key, value
            );
        }
    }

    let sizes = table
        .get("headings")
        .and_then(|h| h.get("sizes"))
        .and_then(|s| s.as_array())
        .expect("default_config.toml: missing headings.sizes");
    if sizes.len() != 6 || !sizes.iter().all(|s| s.as_float().is_some_and(|f| f > 0.0)) {
        panic!("default_config.toml: headings.sizes must be six positive floats");
    }

    let layout = table.get("layout").and_then(|l| l.as_table());
    for (key, max) in [("start_row", 1_048_576), ("column", 16_384)] {
        let value = layout
            .and_then(|l| l.get(key))
            .and_then(|v| v.as_integer())
            .unwrap_or_else(|| panic!("default_config.toml: missing layout.{}", key));
        if !(1..=max).contains(&value) {
            panic!("default_config.toml: layout.{} = {} is out of range", key, value);
        }
    }
}
