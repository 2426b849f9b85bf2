use std::hint::black_box;
use std::time::Instant;

use glam::Vec2;
use isoworks_common::Rect;
use isoworks_tilemap::{IsoProjection, Tile, TileMap};

fn make_map(size: i32) -> TileMap {
    let mut map = TileMap::new(size, size);
    for y in 0..size {
        for x in 0..size {
            let height = if (x * 7 + y * 13) % 11 == 0 { 1 } else { 0 };
            map.set(x, y, Tile::new(1 + ((x + y) % 4) as u32).with_height(height));
        }
    }
    map
}

fn bench_visible(size: i32, iterations: usize) {
    let map = make_map(size);
    let mut proj = IsoProjection::default();
    let viewport = Rect::new(0.0, 0.0, 1280.0, 720.0);

    let start = Instant::now();
    let mut total = 0usize;
    for i in 0..iterations {
        // Sweep the camera across the map.
        proj.set_camera(Vec2::new((i % 64) as f32 * 16.0 - 640.0, (i % 32) as f32 * 8.0));
        total += black_box(map.visible_tiles(black_box(&proj), black_box(viewport))).len();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  visible_tiles ({size}x{size} map, {iterations} iters): {per_iter:?}/iter, avg {} tiles, total {elapsed:?}",
        total / iterations
    );
}

fn bench_projection(iterations: usize) {
    let proj = IsoProjection::default();
    let start = Instant::now();
    for i in 0..iterations {
        let p = Vec2::new((i % 100) as f32, (i / 100 % 100) as f32);
        let _ = black_box(proj.screen_to_tile(proj.tile_to_screen(black_box(p))));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  projection round trip ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn main() {
    println!("=== Tile Visibility Benchmarks ===\n");

    println!("Visibility pass:");
    bench_visible(32, 10000);
    bench_visible(256, 1000);
    bench_visible(1024, 100);

    println!("\nProjection:");
    bench_projection(1_000_000);

    println!("\n=== Done ===");
}
