use living_world_core::{generate_world, World, WorldRequest};

pub fn request(seed: i64, width: u32, height: u32) -> WorldRequest {
    WorldRequest {
        seed,
        width,
        height,
        preset: "default".to_string(),
        density: 1.0,
    }
}

pub fn build_world(seed: i64, width: u32, height: u32) -> World {
    generate_world(&request(seed, width, height)).expect("request is valid")
}

pub fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
