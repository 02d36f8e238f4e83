use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use log::info;

// Frame carts are named after a counter starting at PICO-8's most negative
// fixed-point number, stepping by the smallest printable increment. The
// player cart keeps the same counter and derives each reload path from it,
// so the filenames never need to be listed anywhere.
const FIRST_FRAME_KEY: f64 = -32768.0;
const FRAME_KEY_STEP: f64 = 0.0001;

/// Cart filename for the frame at `index`, e.g. `-32768.p8`,
/// `-32767.9999.p8`, ...
pub fn frame_cart_name(index: usize) -> String {
    let key = FIRST_FRAME_KEY + index as f64 * FRAME_KEY_STEP;
    format!("{}.p8", key)
}

const PLAYER_SCRIPT: &str = r#"pico-8 cartridge // http://www.pico-8.com
version 42
__lua__
local f = -32768.0
local s = 1

function _draw()
 if s == 0 then
  print("paused",0,122,7)
 elseif s != 1 then
  print("speed: x"..s,0,122,7)
 end
end

function _update60()
 if btnp(⬅️) then
  s -= (s == 1 and 2 or 1)
 elseif btnp(➡️) then
  s += (s == -1 and 2 or 1)
 elseif btnp(❎) then
  s = (s == 0 and 1 or 0)
 end
 if s != 0 then
  f += 0.0001 * s
  reload(0x6000, 0, 0x2000, "frames/" .. f .. ".p8")
 end
end
"#;

/// Write the player cartridge that streams the frame carts back into
/// screen memory.
pub fn write_player(output_dir: &Path) -> Result<()> {
    let path = output_dir.join("player.p8");
    info!("Writing player cart to {}", path.display());
    fs::write(&path, PLAYER_SCRIPT)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Launch PICO-8 on the player cart without waiting for it to exit.
/// Requires `pico8` on PATH.
pub fn run_player(output_dir: &Path) -> Result<()> {
    let cart = output_dir.join("player.p8");
    info!("Launching pico8 with {}", cart.display());
    Command::new("pico8")
        .arg("-run")
        .arg(&cart)
        .spawn()
        .context("failed to launch pico8 (is it on PATH?)")?;
    Ok(())
}
