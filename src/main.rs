mod framebuffer;
mod input;
mod level;
mod locate;
mod maze;
mod nav;
mod render3d;
mod rng;
mod textures;

use anyhow::Result;
use clap::Parser;
use rand::Rng;
use raylib::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use input::InputState;
use nav::Navigator;
use render3d::Renderer;
use textures::TextureManager;

const SCREEN_W: u32 = 600;
const SCREEN_H: u32 = 600;

#[derive(Parser)]
#[command(name = "maze-depths", about = "Explorador de laberintos en primera persona")]
struct Cli {
    /// Semilla fija del primer nivel (corridas reproducibles)
    #[arg(long)]
    seed: Option<u32>,

    /// Arrancar con el minimapa visible
    #[arg(long)]
    minimap: bool,

    /// Arrancar en modo vuelo
    #[arg(long)]
    fly: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let seed = match cli.seed {
        Some(s) => (s % 2_000_000_000) as i32,
        None => rand::thread_rng().gen_range(1..1_000_000_000),
    };
    info!(seed, reproducible = cli.seed.is_some(), "arrancando");

    let (mut rl, thread) = raylib::init()
        .size(SCREEN_W as i32, SCREEN_H as i32)
        .title("Maze Depths")
        .build();
    rl.set_target_fps(60);

    let textures = TextureManager::load();
    let mut nav = Navigator::new(seed, cli.seed.is_some());
    nav.minimap = cli.minimap;
    nav.camera.fly = cli.fly;

    let mut renderer = Renderer::new(SCREEN_W, SCREEN_H);

    // textura persistente: el framebuffer CPU se sube aqui cada frame
    let blank = Image::gen_image_color(SCREEN_W as i32, SCREEN_H as i32, Color::BLACK);
    let mut screen = rl
        .load_texture_from_image(&thread, &blank)
        .map_err(anyhow::Error::msg)?;

    while !rl.window_should_close() {
        let dt = rl.get_frame_time();

        // un tick: snapshot de input -> navegacion -> render
        let snapshot = InputState::poll(&rl);
        nav.tick(&snapshot, dt);
        renderer.render(&nav, &textures);
        renderer.frame.upload_to_texture(&mut screen);

        let hud = format!(
            "Nivel {}  Piso {}/{}",
            nav.level.index + 1,
            nav.floor_index + 1,
            nav.level.floor_count()
        );
        let fly_on = nav.camera.fly;

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        d.draw_texture(&screen, 0, 0, Color::WHITE);
        d.draw_text(&hud, 10, SCREEN_H as i32 - 28, 20, Color::WHITE);
        if fly_on {
            d.draw_text("VUELO", 10, SCREEN_H as i32 - 52, 20, Color::SKYBLUE);
        }
    }

    Ok(())
}
