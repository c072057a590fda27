use std::process;

use serde::Serialize;

use m17n_core::EngineId;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Debug, Serialize)]
struct NameInfo {
    engine_name: String,
    lang: String,
    variant: String,
    class_name: String,
    settings_path: String,
}

impl From<&EngineId> for NameInfo {
    fn from(id: &EngineId) -> Self {
        Self {
            engine_name: id.engine_name(),
            lang: id.lang().to_string(),
            variant: id.variant().to_string(),
            class_name: id.class_name(),
            settings_path: id.settings_path(),
        }
    }
}

fn print_info(id: &EngineId, json: bool) {
    let info = NameInfo::from(id);
    if json {
        let out = die!(serde_json::to_string_pretty(&info), "Error: {}");
        println!("{out}");
        return;
    }
    println!("engine:   {}", info.engine_name);
    println!("lang:     {}", info.lang);
    println!("variant:  {}", info.variant);
    println!("class:    {}", info.class_name);
    println!("settings: {}", info.settings_path);
    if let Some(retry) = id.metadata_retry() {
        println!("metadata: retried as {retry}");
    }
}

pub fn name_cmd(engine_name: &str, json: bool) {
    let id = die!(EngineId::parse(engine_name), "Error: {}");
    print_info(&id, json);
}

pub fn class_cmd(class_name: &str, json: bool) {
    let id = die!(EngineId::from_class_name(class_name), "Error: {}");
    print_info(&id, json);
}
