use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::rect::Rect;

use oxid8::{Chip8, Quirks};

/// CHIP-8 emulator.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// ROM image, loaded at 0x200
    rom: PathBuf,

    /// Instruction cycles per second
    #[arg(long, default_value_t = 700)]
    cycles: u32,

    /// Window pixels per CHIP-8 pixel
    #[arg(long, default_value_t = 10)]
    scale: u32,

    /// Wrap sprites at the screen edge instead of clipping
    #[arg(long)]
    wrap_sprites: bool,

    /// Shifts read their operand from Vy (COSMAC VIP behavior)
    #[arg(long)]
    shift_source_vy: bool,
}

/// The conventional 4x4 pad layout on the left of a qwerty keyboard.
fn keymap(key: Keycode) -> Option<usize> {
    let mapped = match key {
        Keycode::Num1 => 0x1,
        Keycode::Num2 => 0x2,
        Keycode::Num3 => 0x3,
        Keycode::Num4 => 0xC,
        Keycode::Q => 0x4,
        Keycode::W => 0x5,
        Keycode::E => 0x6,
        Keycode::R => 0xD,
        Keycode::A => 0x7,
        Keycode::S => 0x8,
        Keycode::D => 0x9,
        Keycode::F => 0xE,
        Keycode::Z => 0xA,
        Keycode::X => 0x0,
        Keycode::C => 0xB,
        Keycode::V => 0xF,
        _ => return None,
    };
    Some(mapped)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut emu = Chip8::with_quirks(Quirks {
        wrap_sprites: args.wrap_sprites,
        shift_source_vy: args.shift_source_vy,
    });
    let rom = fs::read(&args.rom)?;
    emu.load_rom(&rom)?;
    info!("loaded {} ({} bytes)", args.rom.display(), rom.len());

    let sdl_ctx = sdl2::init()?;
    let video = sdl_ctx.video()?;
    let window = video
        .window("oxid8", 64 * args.scale, 32 * args.scale)
        .position_centered()
        .build()?;
    let mut canvas = window.into_canvas().build()?;
    let mut event_pump = sdl_ctx.event_pump()?;

    let black = Color::RGB(0, 0, 0);
    let white = Color::RGB(255, 255, 255);
    canvas.set_draw_color(black);
    canvas.clear();
    canvas.present();

    let frame = Duration::from_micros(1_000_000 / 60);
    let cycles_per_frame = (args.cycles / 60).max(1);

    let mut last = Instant::now();
    'main: loop {
        let mut redraw = false;
        for _ in 0..cycles_per_frame {
            if let Err(fault) = emu.step() {
                error!("halting: {fault}");
                break 'main;
            }
            redraw |= emu.draw_flag();
        }

        let now = Instant::now();
        emu.advance_timers(now - last);
        last = now;

        if redraw {
            canvas.set_draw_color(black);
            canvas.clear();
            canvas.set_draw_color(white);
            let scale = args.scale as i32;
            for (idx, on) in emu.gfx().pixels().iter().enumerate() {
                if !*on {
                    continue;
                }
                let x = (idx % 64) as i32 * scale;
                let y = (idx / 64) as i32 * scale;
                canvas.fill_rect(Rect::new(x, y, args.scale, args.scale))?;
            }
            canvas.present();
        }

        for e in event_pump.poll_iter() {
            match e {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'main,
                Event::KeyDown {
                    keycode: Some(k), ..
                } => {
                    if let Some(key) = keymap(k) {
                        emu.press_key(key);
                    }
                }
                Event::KeyUp {
                    keycode: Some(k), ..
                } => {
                    if let Some(key) = keymap(k) {
                        emu.release_key(key);
                    }
                }
                _ => {}
            }
        }

        std::thread::sleep(frame);
    }
    Ok(())
}
