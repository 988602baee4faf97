//! Browser host: mounting, frame scheduling, resize and unload handling

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, info};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, Window};

use super::SurfaceSize;
use crate::Viewport;
use crate::driver::FrameDriver;
use crate::renderer::CanvasSurface;
use crate::settings::Settings;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Everything the frame and event callbacks share
struct App {
    driver: FrameDriver,
    surface: CanvasSurface,
    container: Element,
    canvas: HtmlCanvasElement,
    max_dpr: f32,
    /// Pending animation frame request
    raf_id: Option<i32>,
    /// Kept so it can be removed on teardown
    resize_listener: Option<Closure<dyn FnMut(web_sys::Event)>>,
}

impl App {
    /// Size the canvas to the container and return the CSS viewport
    fn fit_surface(&mut self, window: &Window) -> Viewport {
        let viewport = Viewport::new(
            self.container.client_width() as f32,
            self.container.client_height() as f32,
        );
        let size = SurfaceSize::for_viewport(viewport, window.device_pixel_ratio() as f32, self.max_dpr);
        self.canvas.set_width(size.pixel_width);
        self.canvas.set_height(size.pixel_height);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", viewport.width));
        let _ = style.set_property("height", &format!("{}px", viewport.height));
        self.surface.set_scale(size.scale);
        viewport
    }
}

/// A running backdrop; `teardown` stops it for good
pub struct MountHandle {
    app: Rc<RefCell<App>>,
}

impl MountHandle {
    pub fn teardown(&self) {
        teardown(&self.app);
    }
}

/// Start the backdrop on the configured canvas.
///
/// Returns `None`, with no side effects, when the container, the canvas or
/// a 2D context is missing, or when reduced motion is preferred.
pub fn mount(settings: Settings) -> Option<MountHandle> {
    let window = web_sys::window()?;
    let document = window.document()?;

    let Some(container) = document.query_selector(&settings.container_selector).ok().flatten() else {
        debug!("No container '{}', not starting", settings.container_selector);
        return None;
    };
    let Some(canvas) = document
        .get_element_by_id(&settings.canvas_id)
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
    else {
        debug!("No canvas '#{}', not starting", settings.canvas_id);
        return None;
    };
    if settings.respect_reduced_motion && prefers_reduced_motion(&window) {
        debug!("Reduced motion preferred, not starting");
        return None;
    }
    let Some(ctx) = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
    else {
        debug!("No 2D context, not starting");
        return None;
    };

    let seed = js_sys::Date::now() as u64;
    let max_dpr = settings.max_device_pixel_ratio;
    let app = Rc::new(RefCell::new(App {
        driver: FrameDriver::new(settings, seed),
        surface: CanvasSurface::new(ctx),
        container,
        canvas,
        max_dpr,
        raf_id: None,
        resize_listener: None,
    }));

    {
        let mut a = app.borrow_mut();
        let viewport = a.fit_surface(&window);
        a.driver.start(viewport);
    }

    install_resize_listener(&window, app.clone());
    install_unload_listener(&window, app.clone());
    request_animation_frame(app.clone());

    info!("Network backdrop mounted (seed {})", seed);
    Some(MountHandle { app })
}

fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

fn install_resize_listener(window: &Window, app: Rc<RefCell<App>>) {
    // The closure lives inside `App`, so it holds only a weak handle back
    let handler_app: Weak<RefCell<App>> = Rc::downgrade(&app);
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        let (Some(window), Some(app)) = (web_sys::window(), handler_app.upgrade()) else {
            return;
        };
        let mut a = app.borrow_mut();
        let viewport = a.fit_surface(&window);
        a.driver.resize(viewport);
    });
    let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    app.borrow_mut().resize_listener = Some(closure);
}

fn install_unload_listener(window: &Window, app: Rc<RefCell<App>>) {
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        teardown(&app);
    });
    let _ = window.add_event_listener_with_callback("beforeunload", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn request_animation_frame(app: Rc<RefCell<App>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let next = app.clone();
    let callback = Closure::once_into_js(move |time: f64| {
        frame(next, time);
    });
    if let Ok(id) = window.request_animation_frame(callback.unchecked_ref()) {
        app.borrow_mut().raf_id = Some(id);
    }
}

fn frame(app: Rc<RefCell<App>>, time: f64) {
    let again = {
        let mut a = app.borrow_mut();
        a.raf_id = None;
        let App { driver, surface, .. } = &mut *a;
        driver.frame(time, surface)
    };
    if again {
        request_animation_frame(app);
    }
}

fn teardown(app: &Rc<RefCell<App>>) {
    let listener = {
        let mut a = app.borrow_mut();
        if let (Some(id), Some(window)) = (a.raf_id.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(id);
        }
        a.driver.teardown();
        a.resize_listener.take()
    };
    if let (Some(listener), Some(window)) = (listener, web_sys::window()) {
        let _ = window.remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref());
    }
}
