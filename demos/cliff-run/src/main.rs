//! Headless demo: a scripted player runs right across a level with a
//! lava pit, a patrolling walker, bonus boxes and a pushable crate,
//! logging every sound and game event the engine produces.
//!
//! There is no window; the draw buffer is built once a second just to
//! show what a renderer would receive.

use anyhow::Result;
use ledge_engine::input::state::{KEY_RIGHT, KEY_SHIFT, KEY_SPACE};
use ledge_engine::{DrawBuffer, GameEvent, InputQueue, LevelContext, LevelDescriptor};
use log::{debug, info};

const DT: f32 = 1.0 / 60.0;
const RUN_FRAMES: u32 = 900;

const LEVEL: &str = r#"{
    "name": "cliff-run",
    "width": 3200,
    "height": 720,
    "player_start": [96, 430],
    "sprites": [
        {"tag": "terrain", "attributes": [
            ["posx", "0"], ["posy", "500"], ["width", "960"], ["height", "220"],
            ["image", "ground"]
        ]},
        {"tag": "terrain", "attributes": [
            ["posx", "1216"], ["posy", "500"], ["width", "1984"], ["height", "220"],
            ["image", "ground"]
        ]},
        {"tag": "lava", "attributes": [
            ["posx", "960"], ["posy", "656"], ["width", "256"], ["height", "64"],
            ["image", "lava"]
        ]},
        {"tag": "platform", "attributes": [
            ["posx", "980"], ["posy", "470"], ["targetx", "1120"], ["speed", "2"],
            ["image", "platform"]
        ]},
        {"tag": "item", "attributes": [
            ["posx", "600"], ["posy", "460"], ["item", "goldpiece"], ["image", "goldpiece"]
        ]},
        {"tag": "item", "attributes": [
            ["posx", "700"], ["posy", "460"], ["item", "goldpiece"], ["image", "goldpiece"]
        ]},
        {"tag": "bonus_box", "attributes": [
            ["posx", "1400"], ["posy", "360"], ["item", "mushroom"], ["image", "box"]
        ]},
        {"tag": "walker", "attributes": [
            ["posx", "1560"], ["posy", "464"], ["direction", "left"], ["image", "walker"]
        ]},
        {"tag": "enemy_stopper", "attributes": [
            ["posx", "1250"], ["posy", "436"]
        ]},
        {"tag": "enemy_stopper", "attributes": [
            ["posx", "1900"], ["posy", "436"]
        ]},
        {"tag": "crate", "attributes": [
            ["posx", "2100"], ["posy", "452"], ["image", "crate"]
        ]},
        {"tag": "bonus_box", "attributes": [
            ["posx", "2400"], ["posy", "360"], ["item", "feather"], ["image", "box"]
        ]}
    ]
}"#;

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let mut ctx = LevelContext::new(960.0, 540.0);
    for name in [
        "placeholder", "ground", "lava", "platform", "goldpiece", "box", "walker", "crate",
        "mushroom", "feather", "player",
    ] {
        ctx.images.insert(name);
    }
    let desc = LevelDescriptor::from_json(LEVEL)?;
    ctx.load_level(&desc)?;
    ctx.player.sprite.image = Some(ctx.images.get_or_placeholder("player"));

    let mut queue = InputQueue::new();
    let mut buf = DrawBuffer::new();
    let mut points = 0.0;
    let mut jump_started: Option<u32> = None;

    for frame in 0..RUN_FRAMES {
        drive(&ctx, &mut queue, frame, &mut jump_started);
        ctx.step(DT, &mut queue);

        for event in &ctx.events {
            match event.kind {
                k if k == GameEvent::KIND_POINTS => {
                    points += event.a;
                    info!("frame {frame}: +{} points (total {})", event.a, points);
                }
                k if k == GameEvent::KIND_ITEM_COLLECTED => {
                    info!("frame {frame}: item {} collected", event.a);
                }
                k if k == GameEvent::KIND_PLAYER_UPGRADE => {
                    info!("frame {frame}: powered up to tier {}", event.a);
                }
                k if k == GameEvent::KIND_PLAYER_HURT => {
                    info!("frame {frame}: hurt, down to tier {}", event.a);
                }
                k if k == GameEvent::KIND_PLAYER_DEAD => {
                    info!("frame {frame}: player died at {:.0},{:.0}", event.a, event.b);
                }
                _ => {}
            }
        }
        for sound in &ctx.sounds {
            debug!("frame {frame}: sound {}", sound.0);
        }

        if frame % 60 == 0 {
            ctx.draw(&mut buf, false);
            let pos = ctx.player.sprite.pos;
            info!(
                "frame {frame}: player {:?} at {:.0},{:.0}, {} draw instances",
                ctx.player.state(),
                pos.x,
                pos.y,
                buf.instance_count()
            );
        }
        if ctx.player.dead {
            break;
        }
    }

    info!(
        "run over: {} points, power {:?}, kills {}, player at {:.0},{:.0}",
        points,
        ctx.player.power,
        ctx.player.kill_count(),
        ctx.player.sprite.pos.x,
        ctx.player.sprite.pos.y,
    );
    Ok(())
}

/// A tiny autopilot: hold a run to the right, leap before the pit,
/// hop into the bonus boxes and ride out whatever happens.
fn drive(ctx: &LevelContext, queue: &mut InputQueue, frame: u32, jump_started: &mut Option<u32>) {
    if frame == 2 {
        queue.key_down(KEY_SHIFT);
        queue.key_down(KEY_RIGHT);
    }

    if let Some(started) = *jump_started {
        if frame.saturating_sub(started) > 20 {
            queue.key_up(KEY_SPACE);
            *jump_started = None;
        }
        return;
    }

    let x = ctx.player.sprite.pos.x;
    let on_ground = ctx.player.state().is_on_ground();
    let near_pit = (820.0..940.0).contains(&x);
    let under_box = (1360.0..1410.0).contains(&x) || (2360.0..2410.0).contains(&x);
    if on_ground && (near_pit || under_box) {
        queue.key_down(KEY_SPACE);
        *jump_started = Some(frame);
    }
}
