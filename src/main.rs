//! mcinput - media center input dispatch on the Linux console
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              Frame Loop                  │
//! ├──────────────────────────────────────────┤
//! │  TTY bytes → TtyDecoder → PlatformEvent  │
//! │  LIRC socket → RemoteControl             │
//! │                  ↓                       │
//! │  InputManager (keymaps, long press)      │
//! │                  ↓                       │
//! │  ConsoleApp (logs resolved actions)      │
//! └──────────────────────────────────────────┘
//! ```

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use mcinput::config::Config;
use mcinput::input::action::{action_name, builtin_command, Action, ACTION_BUILT_IN_FUNCTION};
use mcinput::input::event::{KeyEvent, PlatformEvent};
use mcinput::input::keycodes::{SYM_DOWN, SYM_RETURN};
use mcinput::input::manager::InputManager;
use mcinput::input::window::{self, WindowId, WINDOW_HOME};
use mcinput::input::{Modifiers, TtyDecoder, TtyKeyboard};
use mcinput::services::{
    Application, AudioCues, ControlKind, GuiMessage, Messenger, Services, WindowManager,
};
use mcinput::settings::{SettingValue, SettingsCallback, SETTING_INPUT_ENABLEMOUSE};

/// Ctrl+C in raw mode
const CTRL_C: u8 = 0x03;

// ============================================================================
// Console services
// ============================================================================

/// Application stand-in that prints every action it receives
struct ConsoleApp {
    window: WindowId,
    running: AtomicBool,
    posted: Mutex<Vec<Action>>,
}

impl ConsoleApp {
    fn new(window: WindowId) -> Self {
        Self {
            window,
            running: AtomicBool::new(true),
            posted: Mutex::new(Vec::new()),
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn take_posted(&self) -> Vec<Action> {
        match self.posted.lock() {
            Ok(mut posted) => std::mem::take(&mut *posted),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Application for ConsoleApp {
    fn on_action(&self, action: &Action) -> bool {
        let label = action_name(action.id()).unwrap_or(action.name());
        if label.is_empty() {
            print!("action {:#x}", action.id());
        } else {
            print!("action {} ({})", label, action.id());
        }
        if let Some(ch) = action.unicode() {
            print!(" '{}'", ch);
        }
        if action.hold_time_ms() > 0 {
            print!(" held {}ms", action.hold_time_ms());
        }
        // Raw mode: no implicit carriage return
        print!("\r\n");

        if action.id() == ACTION_BUILT_IN_FUNCTION
            && matches!(builtin_command(action.name()).as_str(), "quit" | "shutdown")
        {
            self.running.store(false, Ordering::SeqCst);
        }
        true
    }

    fn reset_system_idle_timer(&self) {}

    fn reset_screensaver(&self) {}

    fn wake_up_screensaver(&self, _power_key: bool) -> bool {
        false
    }
}

impl WindowManager for ConsoleApp {
    fn active_window(&self) -> WindowId {
        self.window
    }

    fn focused_control(&self) -> Option<ControlKind> {
        None
    }
}

impl AudioCues for ConsoleApp {
    fn play_action_sound(&self, action: &Action) {
        debug!("sound for action {}", action.id());
    }
}

impl Messenger for ConsoleApp {
    fn post_action(&self, action: Action) {
        match self.posted.lock() {
            Ok(mut posted) => posted.push(action),
            Err(poisoned) => poisoned.into_inner().push(action),
        }
    }

    fn send_gui_message(&self, message: GuiMessage) {
        debug!("gui message {:?}", message);
    }

    fn send_cec_toggle_state(&self) -> bool {
        info!("CEC toggle requested (no CEC adapter)");
        true
    }

    fn post_cec_standby(&self) {
        info!("CEC standby requested (no CEC adapter)");
    }
}

// ============================================================================
// CLI
// ============================================================================

fn print_help() {
    println!(
        r#"mcinput {} - media center input dispatch for the Linux console

USAGE:
    mcinput [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    -t, --test              Test mode (resolve a scripted key sequence without a TTY)
    --init-config           Generate a commented config file
    -f, --force             Overwrite an existing config file
    --window=NAME           Keymap window to resolve against (default: home)

KEYS:
    Keys typed on the console are resolved against the keymaps and the
    resulting actions are printed. Hold a key for its long binding.
    Ctrl+C exits.

CONFIG FILE:
    ~/.config/mcinput/config.toml
"#,
        env!("CARGO_PKG_VERSION")
    );
}

fn resolve_window(name: &str) -> WindowId {
    match window::window_from_name(name) {
        Some(id) => id,
        None => {
            warn!("Unknown window '{}', using home", name);
            WINDOW_HOME
        }
    }
}

fn build_manager(cfg: &Config, app: &Arc<ConsoleApp>) -> InputManager {
    let services = Services {
        app: app.clone(),
        windows: app.clone(),
        audio: app.clone(),
        messenger: app.clone(),
        settings: Arc::new(cfg.clone()),
    };
    let mut manager = InputManager::new(services, cfg.input_options());
    manager.set_mouse_resolution(cfg.mouse.max_x, cfg.mouse.max_y, cfg.mouse.speed_x, cfg.mouse.speed_y);

    #[cfg(feature = "remote")]
    if cfg.remote.enabled {
        use mcinput::input::remote::{LircDevice, RemoteControl};
        let mut remote = RemoteControl::new(Box::new(LircDevice::new(&cfg.remote.device)));
        remote.set_device_name(&cfg.remote.device);
        manager.set_remote_control(remote);
    }

    if !manager.load_keymaps() {
        warn!("No keymap could be loaded");
    }
    for device in &cfg.keymaps.devices {
        manager.add_keymap(device);
    }
    manager.initialize_inputs();
    manager
}

/// Feed a short key sequence through the manager and print the result
fn run_test_mode(cfg: &Config, window: WindowId) -> Result<()> {
    let app = Arc::new(ConsoleApp::new(window));
    let mut manager = build_manager(cfg, &app);

    let key = |sym, t| KeyEvent::new(sym, None, Modifiers::empty(), t);
    let script = [
        PlatformEvent::KeyDown(key(SYM_DOWN, 0)),
        PlatformEvent::KeyUp(key(SYM_DOWN, 50)),
        // Short press: resolved on release
        PlatformEvent::KeyDown(key(SYM_RETURN, 100)),
        PlatformEvent::KeyUp(key(SYM_RETURN, 150)),
        // Long press: resolved once while held
        PlatformEvent::KeyDown(key(SYM_RETURN, 200)),
        PlatformEvent::KeyDown(key(SYM_RETURN, 700)),
        PlatformEvent::KeyDown(key(SYM_RETURN, 750)),
        PlatformEvent::KeyUp(key(SYM_RETURN, 800)),
    ];
    for event in &script {
        manager.on_event(event);
        manager.process(window, 0.016);
    }
    eprintln!("[OK] mcinput keymap verification complete");
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Check command line arguments
    let args: Vec<String> = std::env::args().collect();

    // --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // --version
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("mcinput {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // --init-config [--force]
    if args.iter().any(|a| a == "--init-config") {
        let force = args.iter().any(|a| a == "--force" || a == "-f");
        match Config::write_default_config(force) {
            Ok(path) => {
                println!("Config file generated:");
                println!("  Path:   {}", path.display());
                return Ok(());
            }
            Err(e) => {
                eprintln!("Failed to generate config: {:#}", e);
                return Err(e);
            }
        }
    }

    info!("mcinput starting...");

    let mut cfg = Config::load();
    let window_name = args
        .iter()
        .find_map(|a| a.strip_prefix("--window="))
        .map(str::to_string)
        .unwrap_or_else(|| cfg.console.window.clone());
    let window = resolve_window(&window_name);

    if args.iter().any(|a| a == "--test" || a == "-t") {
        return run_test_mode(&cfg, window);
    }

    let app = Arc::new(ConsoleApp::new(window));
    let mut manager = build_manager(&cfg, &app);
    let keymap_changes = manager.subscribe_keymap_changes();

    // Config file change watcher (Linux only)
    // Watch the actual loaded config path and the user keymaps
    #[cfg(target_os = "linux")]
    let config_watcher = Config::config_path().and_then(|path| {
        let mut watcher = mcinput::config::ConfigWatcher::new(&path).ok()?;
        for keymap in cfg.keymap_paths() {
            if let Err(e) = watcher.watch(&keymap) {
                warn!("{:#}", e);
            }
        }
        Some(watcher)
    });
    #[cfg(target_os = "linux")]
    if config_watcher.is_some() {
        info!("Config hot-reload enabled");
    }

    let keyboard = TtyKeyboard::new().context("mcinput needs an interactive terminal")?;
    let mut decoder = TtyDecoder::new(cfg.keyboard.release_timeout_ms);
    let mut frame = Duration::from_millis(cfg.console.frame_interval_ms.max(1));

    print!("mcinput: window {} (Ctrl+C to exit)\r\n", window_name);

    let start = Instant::now();
    let mut last_frame = start;
    let mut buf = [0u8; 256];

    while app.is_running() {
        let now = Instant::now();
        let now_ms = now.duration_since(start).as_millis() as u64;
        let frame_time = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        let n = keyboard.read(&mut buf)?;
        if n > 0 {
            if buf[..n].contains(&CTRL_C) {
                break;
            }
            for event in decoder.decode(&buf[..n], now_ms) {
                manager.on_event(&event);
            }
        }
        if let Some(release) = decoder.poll_release(now_ms) {
            manager.on_event(&release);
        }

        manager.process(window, frame_time);

        for action in app.take_posted() {
            app.on_action(&action);
        }

        #[cfg(target_os = "linux")]
        if config_watcher.as_ref().is_some_and(|w| w.check_reload()) {
            info!("Config changed, reloading");
            cfg = Config::load();
            manager.set_keymap_paths(cfg.keymap_paths(), cfg.device_dirs());
            manager.reload_keymaps();
            manager.on_setting_changed(
                SETTING_INPUT_ENABLEMOUSE,
                &SettingValue::Bool(cfg.input.enable_mouse),
            );
            frame = Duration::from_millis(cfg.console.frame_interval_ms.max(1));
        }

        for change in keymap_changes.try_iter() {
            debug!("Keymap change: {:?}", change);
        }

        std::thread::sleep(frame);
    }

    manager.deinitialize();
    info!("mcinput exiting");
    Ok(())
}
