// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Example: hide and recover a message in a PNG image.
//!
//! Set `RUST_LOG=debug` to see pipeline sizes.
use image::RgbaImage;

use pixveil_core::{capacity, decode, encode, encoded_size, CodecType};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: stego_png <cover.png> <message> <password> [type: 02|03|12|13]");
        eprintln!("       stego_png --decode <stego.png> <password>");
        std::process::exit(1);
    }

    if args[1] == "--decode" {
        let img = image::open(&args[2]).expect("Could not read stego image").to_rgba8();
        let (width, height) = img.dimensions();
        match decode(img.as_raw(), width, height, &args[3]) {
            Ok(message) => println!("Decoded message: {message}"),
            Err(e) => eprintln!("Decode failed: {e}"),
        }
    } else {
        let codec_type: CodecType = match args.get(4) {
            Some(code) => code.parse().expect("Type must be one of 02, 03, 12, 13"),
            None => CodecType::default(),
        };
        let img = image::open(&args[1]).expect("Could not read cover image").to_rgba8();
        let (width, height) = img.dimensions();
        let mut pixels = img.into_raw();

        let available = capacity(&pixels, width, height, codec_type.scatter).expect("Bad image");
        println!(
            "Type {codec_type}: {} of {available} bytes",
            encoded_size(&args[2], codec_type)
        );

        encode(&mut pixels, width, height, &args[2], &args[3], codec_type).expect("Encode failed");

        let out_path = args[1].replace(".png", "_stego.png").replace(".PNG", "_stego.png");
        RgbaImage::from_raw(width, height, pixels)
            .expect("Buffer size mismatch")
            .save(&out_path)
            .expect("Could not write output");
        println!("Stego image written to: {out_path}");
    }
}
