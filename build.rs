use std::fs;

const CONFIG_PATH: &str = "src/default_config.toml";
const SECTIONS: [&str; 2] = ["backend", "export"];

fn main() {
    println!("cargo:rerun-if-changed={CONFIG_PATH}");

    let content = fs::read_to_string(CONFIG_PATH).expect("read bundled default config");
    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("{CONFIG_PATH} is not valid TOML: {e}"),
    };

    for section in SECTIONS {
        if !table.get(section).is_some_and(toml::Value::is_table) {
            panic!("{CONFIG_PATH} is missing the [{section}] table");
        }
    }
}
