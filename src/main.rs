#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release
#![allow(clippy::undocumented_unsafe_blocks)]

use clap::Parser;
use eframe::{egui, egui_glow, glow};
use glow_basic_shader::drawer_quad::Drawer;
use glow_basic_shader::{gl_error, parse_shader_file, ShaderProgramSource};

use egui::mutex::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

/// exit status of every fatal start-up failure
const EXIT_FAILURE: i32 = -1;

#[derive(Parser, Debug)]
#[command(name = "basic-shader", about = "Draw a quad with a program read from a combined shader file")]
struct Cli {
    /// Shader file holding a `#shader vertex` and a `#shader fragment` section.
    #[arg(default_value = "res/shaders/Basic.shader")]
    shader: PathBuf,

    /// Window width in pixels.
    #[arg(short = 'W', long, default_value_t = 640.0)]
    width: f32,

    /// Window height in pixels.
    #[arg(short = 'H', long, default_value_t = 480.0)]
    height: f32,

    /// Window title.
    #[arg(short, long, default_value = "Hello World")]
    title: String,
}

fn main() {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    let cli = Cli::parse();

    let source = parse_shader_file(&cli.shader);
    if source.is_empty() {
        log::error!("no shader sections found in {}", cli.shader.display());
        std::process::exit(EXIT_FAILURE);
    }
    for stage in source.missing_stages() {
        log::warn!(
            "{} has no {stage} section, linking will fail",
            cli.shader.display()
        );
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([cli.width, cli.height])
            .with_title(&cli.title),
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };
    let result = eframe::run_native(
        &cli.title,
        options,
        Box::new(move |cc| Ok(Box::new(MyApp::new(cc, &source)?))),
    );
    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(EXIT_FAILURE);
    }
}

struct MyApp {
    /// Behind an `Arc<Mutex<…>>` so we can pass it to [`egui::PaintCallback`] and paint later.
    drawer: Arc<Mutex<Drawer>>,
}

impl MyApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        source: &ShaderProgramSource,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        use glow::HasContext as _;
        let gl = cc
            .gl
            .as_ref()
            .ok_or("You need to run eframe with the glow backend")?;
        log::info!("{}", unsafe { gl.get_parameter_string(glow::VERSION) });
        let mut drawer = Drawer::new(gl_error::default_poller());
        drawer.compile_shader(gl, source)?;
        drawer.set_quad(gl)?;
        Ok(Self {
            drawer: Arc::new(Mutex::new(drawer)),
        })
    }
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::canvas(ui.style()).show(ui, |ui| {
                self.custom_painting(ui);
            });
        });
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        if let Some(gl) = gl {
            self.drawer.lock().destroy(gl);
        }
    }
}

impl MyApp {
    fn custom_painting(&mut self, ui: &mut egui::Ui) {
        let (rect, _response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
        // Clone locals so we can move them into the paint callback:
        let drawer = self.drawer.clone();
        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(egui_glow::CallbackFn::new(move |_info, painter| {
                drawer.lock().draw(painter.gl());
            })),
        };
        ui.painter().add(callback);
    }
}
