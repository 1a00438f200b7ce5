use backend::config::{self, WindowConfig};
use backend::fatal;
use backend::render::Renderer;
use backend::window::WindowSession;

fn run() -> backend::Result<()> {
    let mut session = WindowSession::create(&WindowConfig::default())?;
    let renderer = Renderer::load(
        config::CLEAR_COLOR,
        config::VERTEX_SPIRV,
        config::FRAGMENT_SPIRV,
    )?;

    while session.poll_events()? {
        if session.state().quitting() {
            continue;
        }
        renderer.draw_frame(&mut session)?;
    }

    // GL objects go before the context they live in
    drop(renderer);
    session.release_context();
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        fatal::exit_on_error(&e);
    }
}
