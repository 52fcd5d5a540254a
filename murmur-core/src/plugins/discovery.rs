//! Plugin discovery
//!
//! The host enumerates its installed extension units; each unit declares the
//! plugins it exports. Discovery walks units in the order given and exports
//! in the order declared, so the same enumeration always yields the same
//! plugin order.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use libloading::Library;
use murmur_plugin_api::{API_VERSION, Plugin, PluginError};

use super::isolation::{PluginFailure, Stage, isolate};

type PluginFactory = Box<dyn FnOnce() -> Result<Box<dyn Plugin>, PluginError>>;

/// One plugin a unit offers, not yet constructed
pub struct PluginExport {
    name: String,
    api_version: u32,
    factory: PluginFactory,
    library: Option<Arc<Library>>,
}

impl PluginExport {
    /// Declare an export built against the current API version
    pub fn new(
        name: impl Into<String>,
        factory: impl FnOnce() -> Result<Box<dyn Plugin>, PluginError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            api_version: API_VERSION,
            factory: Box::new(factory),
            library: None,
        }
    }

    /// Override the API version the export claims to be built against
    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    /// Keep a shared library loaded for as long as the plugin lives
    pub(crate) fn with_library(mut self, library: Arc<Library>) -> Self {
        self.library = Some(library);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn api_version(&self) -> u32 {
        self.api_version
    }
}

impl fmt::Debug for PluginExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginExport")
            .field("name", &self.name)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

/// An installed extension unit as seen by the host
pub trait ExtensionUnit {
    /// Identifier of the unit; the host's own unit is skipped
    fn unit_id(&self) -> &str;

    /// Plugins this unit exports, in declaration order.
    ///
    /// A unit may export none or several. Called once per discovery run.
    fn exports(&self) -> Result<Vec<PluginExport>, PluginError>;
}

type SharedFactory = Arc<dyn Fn() -> Result<Box<dyn Plugin>, PluginError> + Send + Sync>;

/// An extension unit compiled into the host process.
///
/// Extensions register their plugins explicitly at startup instead of
/// being found by introspection.
///
/// ```
/// use murmur_core::plugins::StaticUnit;
/// use murmur_plugin_api::Plugin;
///
/// struct Greeter;
///
/// impl Plugin for Greeter {
///     fn plugin_id(&self) -> String {
///         "greeter".to_string()
///     }
/// }
///
/// let unit = StaticUnit::new("greeter-mod").with_plugin("greeter", || Ok(Box::new(Greeter)));
/// ```
pub struct StaticUnit {
    id: String,
    factories: Vec<(String, SharedFactory)>,
}

impl StaticUnit {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            factories: Vec::new(),
        }
    }

    /// Declare a plugin export
    pub fn with_plugin<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Plugin>, PluginError> + Send + Sync + 'static,
    {
        self.factories.push((name.into(), Arc::new(factory)));
        self
    }
}

impl ExtensionUnit for StaticUnit {
    fn unit_id(&self) -> &str {
        &self.id
    }

    fn exports(&self) -> Result<Vec<PluginExport>, PluginError> {
        Ok(self
            .factories
            .iter()
            .map(|(name, factory)| {
                let factory = Arc::clone(factory);
                PluginExport::new(name.clone(), move || factory())
            })
            .collect())
    }
}

/// A constructed plugin together with where it came from.
///
/// Field order matters: the plugin is dropped before the library holding
/// its code.
pub struct DiscoveredPlugin {
    plugin: Box<dyn Plugin>,
    id: String,
    unit: String,
    export: String,
    _library: Option<Arc<Library>>,
}

impl DiscoveredPlugin {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Unit that exported the plugin
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Export name inside the unit
    pub fn export(&self) -> &str {
        &self.export
    }

    pub fn plugin(&self) -> &dyn Plugin {
        self.plugin.as_ref()
    }

    pub(crate) fn plugin_mut(&mut self) -> &mut dyn Plugin {
        self.plugin.as_mut()
    }
}

impl fmt::Debug for DiscoveredPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveredPlugin")
            .field("id", &self.id)
            .field("unit", &self.unit)
            .field("export", &self.export)
            .finish_non_exhaustive()
    }
}

/// Collect plugins from every unit except the host's own.
///
/// Failures are per candidate: a unit that cannot be inspected, or an
/// export that cannot be constructed, is logged and skipped while the rest
/// of the enumeration is still processed.
pub fn discover_plugins(
    units: &[Box<dyn ExtensionUnit>],
    self_id: &str,
) -> (Vec<DiscoveredPlugin>, Vec<PluginFailure>) {
    let mut plugins = Vec::new();
    let mut failures = Vec::new();
    let mut seen_ids = HashSet::new();

    for unit in units {
        let unit_id = unit.unit_id();
        if unit_id == self_id {
            continue;
        }

        let exports = match isolate(Stage::Discovery, unit_id, || unit.exports()) {
            Ok(exports) => exports,
            Err(failure) => {
                failures.push(failure);
                continue;
            }
        };

        for export in exports {
            let candidate = format!("{}/{}", unit_id, export.name);
            let PluginExport {
                name,
                api_version,
                factory,
                library,
            } = export;

            let constructed = isolate(Stage::Discovery, &candidate, || {
                if api_version != API_VERSION {
                    return Err(PluginError::Unsupported(format!(
                        "built against plugin API v{}, host provides v{}",
                        api_version, API_VERSION
                    )));
                }
                let plugin = factory()?;
                let id = plugin.plugin_id();
                if !seen_ids.insert(id.clone()) {
                    return Err(PluginError::InvalidInput(format!(
                        "plugin id '{}' is already taken",
                        id
                    )));
                }
                Ok((plugin, id))
            });

            match constructed {
                Ok((plugin, id)) => {
                    tracing::debug!(plugin = %id, unit = %unit_id, export = %name, "Discovered plugin");
                    plugins.push(DiscoveredPlugin {
                        plugin,
                        id,
                        unit: unit_id.to_string(),
                        export: name,
                        _library: library,
                    });
                }
                Err(failure) => failures.push(failure),
            }
        }
    }

    (plugins, failures)
}
