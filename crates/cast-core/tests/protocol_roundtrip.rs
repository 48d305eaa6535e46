//! Integration tests for the cast-core protocol codecs.
//!
//! These tests verify the two wire formats through the public API exactly as
//! the host and viewer use them: framed payloads split across arbitrary
//! chunk boundaries, and command lines mixing arrays with single objects.

use cast_core::{
    encode_frame, parse_line,
    protocol::commands::{encode_line, InputCommand, LineAssembler, MouseSide},
    FrameAssembler,
};

/// Feeds `bytes` into a fresh assembler using the given chunk sizes
/// (cycling), returning every decoded frame in order.
fn decode_chunked(bytes: &[u8], chunk_sizes: &[usize]) -> Vec<Vec<u8>> {
    let mut asm = FrameAssembler::new();
    let mut frames = Vec::new();
    let mut offset = 0;
    let mut size_idx = 0;

    while offset < bytes.len() {
        let take = chunk_sizes[size_idx % chunk_sizes.len()].min(bytes.len() - offset);
        size_idx += 1;
        asm.push(&bytes[offset..offset + take]);
        offset += take;

        while let Some(frame) = asm.next_frame().expect("framing must stay in sync") {
            frames.push(frame);
        }
    }
    frames
}

#[test]
fn test_frame_roundtrip_survives_any_chunking() {
    let payloads: Vec<Vec<u8>> = vec![
        Vec::new(),
        vec![0xFF],
        (0u8..=255).collect(),
        vec![0xD8; 4096],
    ];

    let mut wire = Vec::new();
    for p in &payloads {
        wire.extend_from_slice(&encode_frame(p));
    }

    // A spread of pathological chunkings: single bytes, sizes that straddle
    // the 4-byte header, and chunks larger than whole frames.
    for chunk_sizes in [
        vec![1],
        vec![2],
        vec![3, 5, 7],
        vec![4],
        vec![1, 4096],
        vec![wire.len()],
    ] {
        let frames = decode_chunked(&wire, &chunk_sizes);
        assert_eq!(
            frames, payloads,
            "chunk sizes {chunk_sizes:?} must not change decoded frames"
        );
    }
}

#[test]
fn test_two_frames_back_to_back_in_one_chunk() {
    let mut wire = encode_frame(b"frame-a");
    wire.extend_from_slice(&encode_frame(b"frame-b"));

    let frames = decode_chunked(&wire, &[wire.len()]);

    assert_eq!(frames, vec![b"frame-a".to_vec(), b"frame-b".to_vec()]);
}

#[test]
fn test_hello_scenario_consumes_exactly_nine_bytes() {
    let wire = [0x00, 0x00, 0x00, 0x05, 0x48, 0x65, 0x6C, 0x6C, 0x6F];

    let mut asm = FrameAssembler::new();
    asm.push(&wire);
    assert_eq!(asm.next_frame().unwrap(), Some(b"Hello".to_vec()));
    assert_eq!(asm.buffered_len(), 0, "exactly 9 bytes consumed");
}

#[test]
fn test_command_lines_mixing_arrays_and_objects_apply_in_order() {
    // Three lines as one buffered batch: object, array, object.
    let mut asm = LineAssembler::new();
    asm.push(b"{\"type\":\"mouseMove\",\"x\":10,\"y\":20}\n");
    asm.push(b"[{\"type\":\"keyDown\",\"keyCode\":36},{\"type\":\"keyUp\",\"keyCode\":36}]\n");
    asm.push(b"{\"type\":\"mouseScroll\",\"deltaY\":120}\n");

    let mut applied = Vec::new();
    while let Some(line) = asm.next_line() {
        applied.extend(parse_line(&line).expect("all lines are valid"));
    }

    assert_eq!(
        applied,
        vec![
            InputCommand::MouseMove { x: 10.0, y: 20.0 },
            InputCommand::KeyEvent {
                code: 36,
                down: true
            },
            InputCommand::KeyEvent {
                code: 36,
                down: false
            },
            InputCommand::Scroll { delta_y: 120 },
        ]
    );
}

#[test]
fn test_invalid_json_line_is_isolated_from_neighbours() {
    let mut asm = LineAssembler::new();
    asm.push(b"{\"type\":\"forceModifierReset\"}\nnot-json\n{\"type\":\"mouseDrag\",\"x\":1,\"y\":2}\n");

    let mut good = Vec::new();
    let mut dropped = 0;
    while let Some(line) = asm.next_line() {
        match parse_line(&line) {
            Ok(cmds) => good.extend(cmds),
            Err(_) => dropped += 1,
        }
    }

    assert_eq!(dropped, 1);
    assert_eq!(
        good,
        vec![
            InputCommand::ModifierReset,
            InputCommand::MouseDrag { x: 1.0, y: 2.0 },
        ]
    );
}

#[test]
fn test_viewer_encoded_batch_parses_on_the_host_side() {
    // What the viewer sends for a left click: position sync plus press.
    let batch = vec![
        InputCommand::MouseMove { x: 640.0, y: 480.0 },
        InputCommand::MouseButton {
            side: MouseSide::Left,
            down: true,
            x: 640.0,
            y: 480.0,
        },
    ];
    let line = encode_line(&batch).expect("encode");
    assert!(line.ends_with('\n'));

    let mut asm = LineAssembler::new();
    asm.push(line.as_bytes());
    let parsed = parse_line(&asm.next_line().expect("one complete line")).expect("parse");

    assert_eq!(parsed, batch);
}
