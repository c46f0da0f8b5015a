use std::rc::Rc;

use anyhow::Result;
use pica_audio::SoundFileFactory;
use pica_engine::coords::{Vec2, Vec2i, Vec3};
use pica_engine::device::{CommandRecorder, GpuCommand, RecorderInit};
use pica_engine::logging::{init_logging, LoggingConfig};
use pica_engine::memory::{HeapInit, LinearHeap};
use pica_engine::paint::Color;
use pica_engine::render::{PrimitiveType, RenderStates, RenderTarget, TargetInit, Vertex, BLEND_ADD};
use pica_engine::resource::Texture;
use pica_engine::scene::{Geometry, Shape, VertexArray};

const FRAMES: usize = 3;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let heap = LinearHeap::new(HeapInit::default())?;
    let gpu = CommandRecorder::new(RecorderInit::default());
    let recorded = gpu.log();
    let mut target = RenderTarget::new(gpu, &heap, TargetInit::default())?;

    // No codecs are registered; the factory is only shown being built.
    let sounds = SoundFileFactory::new();
    if let Err(err) = sounds.create_reader_from_memory(b"RIFF") {
        log::info!("audio: {err}");
    }

    let atlas = Rc::new(Texture::new(1, 256, 256));

    let mut card = Shape::new(&heap, Geometry::rectangle(Vec2::new(64.0, 48.0)))?;
    card.set_texture(Some(Rc::clone(&atlas)), true);
    card.transformable_mut().set_position(Vec2::new(40.0, 40.0));

    let mut ball = Shape::new(&heap, Geometry::circle(16.0))?;
    ball.set_fill_color(Color::RED);
    ball.transformable_mut().set_origin(Vec2::new(16.0, 16.0));

    // Large enough to skip the vertex cache.
    let mut stars = VertexArray::new(&heap, PrimitiveType::Triangles, 0)?;
    for i in 0..120 {
        let x = (i * 37 % 400) as f32;
        let y = (i * 91 % 240) as f32;
        for (dx, dy) in [(0.0, 0.0), (2.0, 0.0), (1.0, 2.0)] {
            stars.append(Vertex::with_color(Vec3::new(x + dx, y + dy, 0.0), Color::WHITE))?;
        }
    }

    for frame in 0..FRAMES {
        target.clear(Color::BLACK);
        target.draw(&stars, &RenderStates::default().with_blend_mode(BLEND_ADD));

        ball.transformable_mut().set_position(Vec2::new(200.0 + 20.0 * frame as f32, 120.0));
        ball.transformable_mut().rotate(15.0);
        target.draw(&ball, &RenderStates::default());
        target.draw(&card, &RenderStates::default());

        let commands = recorded.take();
        log::info!(
            "frame {frame}: {} commands, {} draws, {} state changes",
            commands.len(),
            commands.iter().filter(|c| matches!(c, GpuCommand::DrawArrays { .. })).count(),
            commands.iter().filter(|c| c.is_state_change()).count(),
        );
    }

    let pixel = Vec2i::new(200, 120);
    let world = target.map_pixel_to_coords(pixel);
    log::info!(
        "pixel ({}, {}) -> world ({:.1}, {:.1}) -> pixel {:?}",
        pixel.x,
        pixel.y,
        world.x,
        world.y,
        target.map_coords_to_pixel(world)
    );
    log::info!(
        "linear heap: {} of {} bytes in use",
        heap.used_bytes(),
        heap.capacity()
    );

    Ok(())
}
