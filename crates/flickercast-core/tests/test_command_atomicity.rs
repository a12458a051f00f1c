//! Commands posted from another thread while the tick loop runs.

use std::thread;

use flickercast_core::{channel, Bit, Command, Step, Transmitter, TransmitterState, TxEvent};

/// Every word is applied as a whole: after any step the bits queued plus
/// the word bits already latched always add up to whole bytes.
#[test]
fn test_enqueue_never_observed_partially() {
    let (tx, inbox) = channel();
    let mut transmitter = Transmitter::new(TransmitterState::default(), inbox);

    let words = 50;
    let producer = thread::spawn(move || {
        for _ in 0..words {
            tx.send(Command::EnqueueWord("B".to_string())).unwrap();
            thread::yield_now();
        }
        tx
    });

    let mut queued_events = 0;
    for _ in 0..5_000 {
        let Step::Frame { events, .. } = transmitter.step() else {
            panic!("transmitter stopped unexpectedly");
        };
        queued_events += events
            .iter()
            .filter(|e| matches!(e, TxEvent::WordQueued { bits: 8, .. }))
            .count();

        let state = transmitter.state();
        let in_flight = state.source().queued_bits() as u64 + state.stats().word_bits;
        assert_eq!(in_flight % 8, 0, "partial word visible to the tick loop");
        assert_eq!(in_flight, state.stats().words_queued * 8);
    }

    let tx = producer.join().unwrap();
    tx.send(Command::Quit).unwrap();
    loop {
        if let Step::Quit { .. } = transmitter.step() {
            break;
        }
    }

    let stats = transmitter.into_state().stats().clone();
    assert!(queued_events <= words);
    assert!(stats.words_queued <= words as u64);
}

/// Words decode back to "B" in order, whatever the interleaving with ticks.
#[test]
fn test_concurrent_words_decode_in_order() {
    let (tx, inbox) = channel();
    let mut transmitter = Transmitter::new(TransmitterState::default(), inbox);

    let producer = thread::spawn(move || {
        for _ in 0..4 {
            tx.send(Command::EnqueueWord("B".to_string())).unwrap();
        }
        tx
    });
    let _tx = producer.join().unwrap();

    let mut bits = Vec::new();
    loop {
        match transmitter.step() {
            Step::Frame { sample, .. } => {
                if sample.frame % 12 == 0 {
                    if let Some(bit) = sample.bit {
                        bits.push(bit);
                    }
                }
            }
            Step::Quit { .. } => panic!("transmitter stopped unexpectedly"),
        }
        if bits.len() == 32 {
            break;
        }
    }

    let b = [
        Bit::Zero,
        Bit::One,
        Bit::Zero,
        Bit::Zero,
        Bit::Zero,
        Bit::Zero,
        Bit::One,
        Bit::Zero,
    ];
    let expected: Vec<Bit> = b.iter().copied().cycle().take(32).collect();
    assert_eq!(bits, expected);
}
