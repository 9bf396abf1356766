use {
    app_core::AppCorePlugin,
    bevy::{log::LogPlugin, prelude::*},
};

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins.set(LogPlugin {
                filter: "error,loading=debug,\
                    progression=debug,\
                    quiz=debug,\
                    matching=debug,\
                    exploration=debug,\
                    microscope=debug,\
                    guide=debug,\
                    save_load=debug"
                    .into(),
                level: bevy::log::Level::INFO,
                ..Default::default()
            }),
        )
        .add_plugins(AppCorePlugin)
        .run();
}
