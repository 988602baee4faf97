//! Network Backdrop entry point
//!
//! On the web this mounts the backdrop onto the page canvas. Natively it
//! drives the simulation headless and logs what each frame would draw.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let settings = network_backdrop::Settings::load();
    // The beforeunload handler owns teardown
    let _ = network_backdrop::platform::web::mount(settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use network_backdrop::renderer::CommandList;
    use network_backdrop::{FrameDriver, Settings, Viewport};

    // Synthetic frames at ~60 Hz
    const FRAMES: u32 = 600;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    env_logger::init();
    log::info!("Network Backdrop (native, headless) starting...");

    let path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let settings = Settings::load_file(path.as_deref());
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    let mut driver = FrameDriver::new(settings, seed);
    driver.start(Viewport::new(1280.0, 720.0));

    let mut surface = CommandList::new();
    for i in 0..FRAMES {
        surface.clear();
        if !driver.frame(i as f64 * FRAME_MS, &mut surface) {
            break;
        }
        if i % 60 == 0 {
            if let Some(world) = driver.world() {
                log::info!(
                    "frame {:>4}: {} links, {} packets, {} draw commands",
                    i,
                    world.links.len(),
                    world.packets.len(),
                    surface.len()
                );
            }
        }
    }

    driver.teardown();
}
