//! Types for use when configuring GraphWeft modules.

use crate::*;

/// Denotes a type used to configure a specific GraphWeft module.
///
/// Note, the types defined in this trait's implementors are specifically for
/// configuration that cannot be changed at runtime, the likes of which might
/// be found in a configuration file.
///
/// It is highly recommended that you expose this struct in your module docs
/// to help devs using your module understand how to configure it.
pub trait ModConfig:
    'static
    + Sized
    + Default
    + std::fmt::Debug
    + serde::Serialize
    + serde::de::DeserializeOwned
    + Send
    + Sync
{
}

/// GraphWeft configuration.
///
/// A flat json map of module-name keyed configuration objects. This can be
/// loaded from disk and edited by humans, so module config serialization
/// should be tolerant to missing properties, setting sane defaults.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Config(serde_json::Map<String, serde_json::Value>);

impl Config {
    /// When generating a default or example configuration file, the
    /// configured module factories call this any number of times to add
    /// their default configuration parameters to the file.
    pub fn set_module_config<M: ModConfig>(
        &mut self,
        module_config: &M,
    ) -> WeftResult<()> {
        let encoded = serde_json::to_value(module_config)
            .map_err(|e| WeftError::other_src("encode module config", e))?;
        let serde_json::Value::Object(map) = encoded else {
            return Err(WeftError::other(
                "module config must serialize to an object",
            ));
        };
        for (name, value) in map {
            if self.0.contains_key(&name) {
                return Err(WeftError::other(format!(
                    "Refusing to overwrite conflicting module name: {name}"
                )));
            }
            self.0.insert(name, value);
        }
        Ok(())
    }

    /// When a module is initializing, its factory may call this to extract
    /// its module config. Unset modules get their default.
    pub fn get_module_config<M: ModConfig>(&self) -> WeftResult<M> {
        serde_json::from_value(serde_json::Value::Object(self.0.clone()))
            .map_err(|e| WeftError::other_src("decode module config", e))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn config_usage_example() {
        #[derive(
            Debug, Default, serde::Serialize, serde::Deserialize, PartialEq,
        )]
        #[serde(rename_all = "camelCase")]
        struct Mod1Config {
            #[serde(default)]
            p_a: u32,
            #[serde(default)]
            p_b: String,
        }

        #[derive(
            Debug, Default, serde::Serialize, serde::Deserialize, PartialEq,
        )]
        #[serde(rename_all = "camelCase")]
        struct Mod1ModConfig {
            #[serde(default)]
            mod1: Mod1Config,
        }

        impl ModConfig for Mod1ModConfig {}

        let mut config = Config::default();
        config
            .set_module_config(&Mod1ModConfig::default())
            .unwrap();

        // a second registration under the same module name must be refused
        config
            .set_module_config(&Mod1ModConfig::default())
            .unwrap_err();

        // output the "default" config
        assert_eq!(
            r#"{
  "mod1": {
    "pA": 0,
    "pB": ""
  }
}"#,
            serde_json::to_string_pretty(&config).unwrap()
        );

        // ensure we can load a weird config from disk
        let config: Config = serde_json::from_str(
            r#"{
              "modBAD": { "foo": "bar" },
              "mod1": { "pB": "test-p_b", "extra": "foo" }
            }"#,
        )
        .unwrap();

        assert_eq!(
            Mod1ModConfig {
                mod1: Mod1Config {
                    p_a: 0,
                    p_b: "test-p_b".to_string(),
                },
            },
            config.get_module_config().unwrap(),
        );

        // unset mods get the default
        let config = Config::default();
        assert_eq!(
            Mod1ModConfig::default(),
            config.get_module_config().unwrap(),
        );
    }
}
