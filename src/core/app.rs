//! Application initialization and configuration

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;

use crate::core::cli::CliArgs;
use crate::core::keys::Keymap;
use crate::core::script::ScriptRunner;
use crate::core::session::Core;
use crate::core::settings::Settings;
use crate::systems::{EditorCore, EditorKeymap, ToolDispatchPlugin};
use crate::tools::context::LoggingInterface;

/// Creates a headless Bevy application that opens the document, runs the
/// script given on the command line and saves the result
pub fn create_app(cli_args: CliArgs) -> Result<App, String> {
    cli_args.validate()?;

    let mut app = App::new();
    configure_app_settings(&mut app, cli_args)?;
    add_all_plugins(&mut app);
    Ok(app)
}

/// Sets up application resources and configuration
fn configure_app_settings(app: &mut App, cli_args: CliArgs) -> Result<(), String> {
    let settings = match &cli_args.settings {
        Some(path) => Settings::load(path).map_err(|e| format!("{e:#}"))?,
        None => Settings::default(),
    };
    let keymap = Keymap::from_settings(&settings).map_err(|e| format!("{e:#}"))?;
    let core = match &cli_args.load {
        Some(path) => Core::open(path, &settings, Box::new(LoggingInterface))
            .map_err(|e| format!("{e:#}"))?,
        None => Core::new(&settings, Box::new(LoggingInterface)),
    };

    app.insert_resource(cli_args)
        .insert_resource(settings)
        .insert_resource(EditorKeymap(keymap))
        .insert_resource(EditorCore(core));
    Ok(())
}

/// Adds all plugins to the application in logical groups
fn add_all_plugins(app: &mut App) {
    // One pass through the schedules is all a scripted session needs.
    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_once()));
    app.add_plugins(ToolDispatchPlugin);
    add_startup_systems(app);
}

/// Adds startup and update systems
fn add_startup_systems(app: &mut App) {
    app.add_systems(Startup, run_startup_script)
        .add_systems(Last, save_on_exit);
}

/// Marks a session whose script did not run to the end.
#[derive(Resource)]
struct ScriptFailed;

/// System to run the script given with `--script`
fn run_startup_script(
    mut commands: Commands,
    cli_args: Res<CliArgs>,
    keymap: Res<EditorKeymap>,
    mut core: ResMut<EditorCore>,
    mut app_exit_events: EventWriter<AppExit>,
) {
    let Some(path) = &cli_args.script else {
        info!("No script given, nothing to do");
        return;
    };
    match ScriptRunner::new(&mut core.0, &keymap.0).run_file(path) {
        Ok(report) => {
            info!(
                "Ran {}: {} commits, {} refused",
                path.display(),
                report.commits,
                report.refused
            );
        }
        Err(e) => {
            error!("Script {} failed: {:#}", path.display(), e);
            commands.insert_resource(ScriptFailed);
            app_exit_events.write(AppExit::error());
        }
    }
}

/// System to write the document to the `--save` path
fn save_on_exit(
    cli_args: Res<CliArgs>,
    failed: Option<Res<ScriptFailed>>,
    mut core: ResMut<EditorCore>,
    mut app_exit_events: EventWriter<AppExit>,
) {
    let Some(path) = &cli_args.save else {
        return;
    };
    if failed.is_some() {
        warn!("Not saving {}, the script failed", path.display());
        return;
    }
    if let Err(e) = core.0.save_as(path) {
        error!("Failed to save {}: {:#}", path.display(), e);
        app_exit_events.write(AppExit::error());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn test_script_runs_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("square.sws");
        let out = dir.path().join("square.json");
        std::fs::write(&script, "tool DRAW_RECTANGLE\nclick\nmove 2 2\nclick\n").unwrap();

        let cli = CliArgs {
            script: Some(script),
            save: Some(out.clone()),
            ..Default::default()
        };
        let mut app = create_app(cli).unwrap();
        assert!(app.run().is_success());

        let doc = Document::load_from_file(&out).unwrap();
        assert_eq!(doc.entities().count(), 1 + 4);
    }

    #[test]
    fn test_failing_script_exits_with_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("bad.sws");
        std::fs::write(&script, "click\n").unwrap();
        let cli = CliArgs {
            script: Some(script),
            ..Default::default()
        };
        let mut app = create_app(cli).unwrap();
        assert!(app.run().is_error());
    }

    #[test]
    fn test_bad_settings_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("settings.json");
        std::fs::write(&settings, r#"{"keys": {"SPIN": ["s"]}}"#).unwrap();
        let cli = CliArgs {
            settings: Some(settings),
            ..Default::default()
        };
        let err = create_app(cli).err().unwrap();
        assert!(err.contains("SPIN"));
    }
}
