//! A plugin whose handlers succeed, fail and panic

use murmur_plugin_api::{
    EventRegistrar, HostApi, JoinGroup, PlayerDisconnected, Plugin, PluginError, VoiceHost,
};

#[derive(Default)]
pub struct FaultyPlugin;

impl Plugin for FaultyPlugin {
    fn plugin_id(&self) -> String {
        "faulty".to_string()
    }

    fn initialize(&mut self, api: &dyn HostApi) -> Result<(), PluginError> {
        if api.host_name() == "hostile" {
            panic!("refusing to start on {}", api.host_name());
        }
        Ok(())
    }

    fn register_events(&self, registrar: &mut EventRegistrar) -> Result<(), PluginError> {
        registrar.add_event::<VoiceHost, _>(|_| panic!("voice host handler blew up"));
        registrar.add_event::<VoiceHost, _>(|event| {
            event.payload_mut().set_voice_host("voice.faulty.example");
        });

        registrar.try_add_event::<JoinGroup, _>(|_| Err(PluginError::custom("join refused")));
        registrar.add_event::<JoinGroup, _>(|event| {
            event.cancel();
        });

        registrar.add_event::<PlayerDisconnected, _>(|_| panic!("disconnect handler blew up"));
        Ok(())
    }
}

#[cfg(not(feature = "stale-api"))]
murmur_plugin_api::export_plugin!(FaultyPlugin);

#[cfg(feature = "stale-api")]
#[unsafe(no_mangle)]
pub extern "C" fn _murmur_plugin_api_version() -> u32 {
    murmur_plugin_api::API_VERSION + 1
}
