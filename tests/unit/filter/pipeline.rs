use super::*;
use crate::timeline::model::FilterInstance;

fn gradient(w: u32, h: u32) -> Bitmap {
    let mut bmp = Bitmap::new(w, h);
    for y in 0..h {
        for x in 0..w {
            bmp.put_pixel(x, y, [(x * 20) as u8, (y * 20) as u8, 7, 255]);
        }
    }
    bmp
}

#[test]
fn disabled_chain_is_byte_identical() {
    let frame = gradient(5, 4);
    let chain = FilterChain {
        enable: false,
        list: vec![FilterInstance {
            name: FilterName::Blur,
            value: "f=3".into(),
        }],
    };
    let out = apply_filters(&frame, &chain).unwrap();
    assert_eq!(out.data(), frame.data());
}

#[test]
fn enabled_empty_chain_round_trips_the_flip() {
    let frame = gradient(5, 4);
    let chain = FilterChain {
        enable: true,
        list: Vec::new(),
    };
    // Load flips in, present flips back out; no kernels in between.
    let out = apply_filters(&frame, &chain).unwrap();
    assert_eq!(out, frame);
}

#[test]
fn zero_factor_blur_chain_is_identity() {
    let frame = gradient(6, 6);
    let chain = FilterChain {
        enable: true,
        list: vec![FilterInstance {
            name: FilterName::Blur,
            value: "f=0".into(),
        }],
    };
    let out = apply_filters(&frame, &chain).unwrap();
    assert_eq!(out, frame);
}

#[test]
fn chroma_key_runs_upright() {
    // Key out green only in the top row to prove output row order is
    // top-down despite the internal flips.
    let mut frame = Bitmap::new(1, 2);
    frame.put_pixel(0, 0, [0, 255, 0, 255]);
    frame.put_pixel(0, 1, [200, 0, 0, 255]);
    let chain = FilterChain {
        enable: true,
        list: vec![FilterInstance {
            name: FilterName::ChromaKey,
            value: "g=255:f=0.3".into(),
        }],
    };
    let out = apply_filters(&frame, &chain).unwrap();
    assert_eq!(out.pixel(0, 0), [0; 4]);
    assert_eq!(out.pixel(0, 1), [200, 0, 0, 255]);
}

#[test]
fn filters_apply_in_chain_order() {
    let mut frame = Bitmap::new(3, 3);
    frame.fill(crate::foundation::pixel::Rgba8::new(0, 255, 0, 255));
    // Key the green away first; a following blur then sees transparency.
    let chain = FilterChain {
        enable: true,
        list: vec![
            FilterInstance {
                name: FilterName::ChromaKey,
                value: "g=255:f=0.5".into(),
            },
            FilterInstance {
                name: FilterName::Blur,
                value: "f=1".into(),
            },
        ],
    };
    let out = apply_filters(&frame, &chain).unwrap();
    assert_eq!(out.pixel(1, 1), [0; 4]);
}

#[test]
fn empty_frame_is_rejected() {
    let frame = Bitmap::new(0, 0);
    let chain = FilterChain {
        enable: true,
        list: Vec::new(),
    };
    assert!(apply_filters(&frame, &chain).is_err());
}
