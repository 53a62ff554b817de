use anyhow::Result;
use serde::Serialize;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_pretty_json() {
        let value = serde_json::json!({ "ok": true });
        assert_eq!(render_json(&value).unwrap(), "{\n  \"ok\": true\n}");
    }
}
