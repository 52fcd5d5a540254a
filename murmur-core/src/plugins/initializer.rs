//! Plugin initialization

use murmur_plugin_api::HostApi;

use super::discovery::DiscoveredPlugin;
use super::isolation::{PluginFailure, Stage, isolate};

/// Hand one plugin its capability handle.
///
/// A failure is logged and returned. The plugin is not removed; it is still
/// offered the registrar during registration.
pub fn initialize_plugin(
    plugin: &mut DiscoveredPlugin,
    api: &dyn HostApi,
) -> Result<(), PluginFailure> {
    let id = plugin.id().to_string();
    tracing::info!(plugin = %id, "Initializing plugin");
    isolate(Stage::Initialization, &id, || plugin.plugin_mut().initialize(api))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::test_support::{TestPlugin, discovered};
    use murmur_plugin_api::{OfflineServer, Plugin, PluginError};

    #[test]
    fn test_initialize_calls_plugin_once() {
        let plugin = TestPlugin::new("a");
        let mut plugins = discovered(&[plugin.clone()]);

        initialize_plugin(&mut plugins[0], &OfflineServer::default()).unwrap();

        assert_eq!(plugin.init_calls(), 1);
    }

    #[test]
    fn test_initialize_reports_error() {
        let mut plugins = discovered(&[TestPlugin::new("solo").failing_init()]);

        let failure = initialize_plugin(&mut plugins[0], &OfflineServer::default()).unwrap_err();

        assert!(matches!(&failure, PluginFailure::Init { plugin, .. } if plugin == "solo"));
        assert!(failure.to_string().contains("init refused"));
    }

    struct Reader;

    impl Plugin for Reader {
        fn plugin_id(&self) -> String {
            "reader".to_string()
        }

        fn initialize(&mut self, api: &dyn HostApi) -> Result<(), PluginError> {
            if api.voice_distance() <= 0.0 {
                panic!("no voice distance");
            }
            tracing::debug!(host = api.host_name(), "reader ready");
            Ok(())
        }
    }

    #[test]
    fn test_initialize_passes_capability_handle() {
        use crate::plugins::discovery::{ExtensionUnit, StaticUnit, discover_plugins};

        let units: Vec<Box<dyn ExtensionUnit>> = vec![Box::new(
            StaticUnit::new("reader").with_plugin("reader", || Ok(Box::new(Reader))),
        )];
        let (mut plugins, _) = discover_plugins(&units, "host");

        assert!(initialize_plugin(&mut plugins[0], &OfflineServer::new("paper", 48.0)).is_ok());

        let failure =
            initialize_plugin(&mut plugins[0], &OfflineServer::new("paper", 0.0)).unwrap_err();
        assert!(failure.to_string().contains("panicked: no voice distance"));
    }
}
