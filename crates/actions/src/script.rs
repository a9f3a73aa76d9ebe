//! Embedded Lua runtime for `custom.script` actions.
//!
//! Each invocation gets a fresh Lua state with the run's data bag bound to
//! the `data` global. Modules that reach outside the sandbox (os, io, debug,
//! package) are removed before the script runs.

use anyhow::anyhow;
use mlua::{Lua, LuaSerdeExt};
use serde_json::{Map, Value};

use crate::config::ScriptConfig;

/// Evaluate the script body and return the key/value pairs it produced.
///
/// A table result becomes the output record as-is; a scalar result is
/// returned under the `result` key; `nil` produces an empty record.
pub fn run(config: &ScriptConfig, data: &Map<String, Value>) -> anyhow::Result<Map<String, Value>> {
    let lua = Lua::new();
    let globals = lua.globals();

    for module in ["os", "io", "debug", "package"] {
        globals
            .set(module, mlua::Nil)
            .map_err(|e| anyhow!("failed to seal script sandbox: {e}"))?;
    }

    let bag = lua
        .to_value(&Value::Object(data.clone()))
        .map_err(|e| anyhow!("failed to bind data bag: {e}"))?;
    globals
        .set("data", bag)
        .map_err(|e| anyhow!("failed to bind data bag: {e}"))?;

    let result: mlua::Value = lua
        .load(config.script.as_str())
        .eval()
        .map_err(|e| anyhow!("script error: {e}"))?;

    let produced: Value = lua
        .from_value(result)
        .map_err(|e| anyhow!("script produced an unconvertible value: {e}"))?;

    Ok(match produced {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        scalar => {
            let mut out = Map::new();
            out.insert("result".to_owned(), scalar);
            out
        }
    })
}
