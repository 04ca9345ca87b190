use proptest::collection::vec;
use proptest::prelude::*;

use jlcompress::bitstream::block::Block;
use jlcompress::compression::header::{read_flags, HEADER_SIZE};
use jlcompress::huffman_coding::freq_table::FrequencyTable;
use jlcompress::huffman_coding::huffman::{huffman_compress, huffman_decompress};
use jlcompress::huffman_coding::huffman_tree::HuffmanTree;
use jlcompress::tools::flip::{flip_bit_order, unflip_bit_order};
use jlcompress::tools::rle::{
    run_length_compress, run_length_decompress, ESCAPE_SYMBOL, REPEAT_SYMBOL,
};
use jlcompress::{compress_block, decompress_block, CompressionStages, EncodingFlags, JlError, Stage};

fn block(data: &[u8]) -> Block {
    Block::from_bytes(data.to_vec(), EncodingFlags::empty())
}

/// Byte strings built from runs, so long runs and marker bytes both turn up often.
fn runs() -> impl Strategy<Value = Vec<u8>> {
    vec(
        (
            prop_oneof![any::<u8>(), Just(REPEAT_SYMBOL), Just(ESCAPE_SYMBOL)],
            1..300_usize,
        ),
        0..24,
    )
    .prop_map(|runs| {
        runs.into_iter()
            .flat_map(|(byte, len)| std::iter::repeat(byte).take(len))
            .collect()
    })
}

proptest! {
    #[test]
    fn run_length_round_trip(data in runs()) {
        let packed = run_length_compress(&block(&data)).unwrap();
        let unpacked = run_length_decompress(&packed).unwrap().unwrap();
        prop_assert_eq!(unpacked.as_slice(), data.as_slice());
    }

    #[test]
    fn flip_round_trip(data in vec(any::<u8>(), 0..600)) {
        let mut flipped = flip_bit_order(&block(&data)).unwrap();
        prop_assert_eq!(flipped.len(), data.len());
        let unflipped = unflip_bit_order(&mut flipped).unwrap().unwrap();
        prop_assert_eq!(unflipped.as_slice(), data.as_slice());
    }

    #[test]
    fn huffman_round_trip(data in vec(any::<u8>(), 0..2000)) {
        let mut packed = huffman_compress(&block(&data)).unwrap();
        let unpacked = huffman_decompress(&mut packed).unwrap().unwrap();
        prop_assert_eq!(unpacked.as_slice(), data.as_slice());
    }

    #[test]
    fn huffman_size_matches_code_lengths(data in vec(any::<u8>(), 1..1500)) {
        let mut table = FrequencyTable::from_data(&data);
        let tree = HuffmanTree::build(&table).unwrap();
        tree.assign_codes(&mut table).unwrap();

        for symbol in 0..=255_u8 {
            let entry = table.entry(symbol);
            if entry.frequency > 0 {
                prop_assert!(entry.pattern_len > 0, "symbol {} has no code", symbol);
            } else {
                prop_assert_eq!(entry.pattern_len, 0, "unused symbol {} has a code", symbol);
            }
        }

        // count byte, then symbol, byte count and frequency bytes per entry
        let table_bytes: usize = 1 + table
            .present()
            .map(|e| 2 + (64 - e.frequency.leading_zeros() as usize + 7) / 8)
            .sum::<usize>();
        let bits = table.encoded_bits() as usize;
        let packed = huffman_compress(&block(&data)).unwrap();
        prop_assert_eq!(packed.len(), 8 + table_bytes + (bits + 7) / 8);
    }

    #[test]
    fn pipeline_round_trip(data in runs(), flip in any::<bool>(), rle in any::<bool>(), huffman in any::<bool>()) {
        let stages = CompressionStages { flip, rle, huffman };
        let packed = compress_block(block(&data), &stages).unwrap();
        prop_assert_eq!(packed.encoding.contains(Stage::Flip), flip);
        prop_assert_eq!(packed.encoding.contains(Stage::RunLength), rle);
        prop_assert_eq!(packed.encoding.contains(Stage::Huffman), huffman);
        let unpacked = decompress_block(packed).unwrap();
        prop_assert_eq!(unpacked.as_slice(), data.as_slice());
    }
}

#[test]
fn five_repeats_test() {
    let packed = run_length_compress(&block(&[0x41; 5])).unwrap();
    assert_eq!(packed.as_slice(), &[REPEAT_SYMBOL, 4, 0x41]);
    let unpacked = run_length_decompress(&packed).unwrap().unwrap();
    assert_eq!(unpacked.as_slice(), &[0x41; 5]);
}

#[test]
fn separated_repeat_symbols_test() {
    let data = [REPEAT_SYMBOL, b'x', REPEAT_SYMBOL];
    let packed = run_length_compress(&block(&data)).unwrap();
    assert_eq!(
        packed.as_slice(),
        &[ESCAPE_SYMBOL, REPEAT_SYMBOL, b'x', ESCAPE_SYMBOL, REPEAT_SYMBOL]
    );
}

#[test]
fn reflip_is_refused_test() {
    let flipped = flip_bit_order(&block(b"abc")).unwrap();
    assert!(matches!(
        flip_bit_order(&flipped),
        Err(JlError::AlreadyApplied(Stage::Flip))
    ));
}

#[test]
fn stages_apply_once_test() {
    let packed = run_length_compress(&block(b"aaaaaa")).unwrap();
    assert!(matches!(
        run_length_compress(&packed),
        Err(JlError::AlreadyApplied(Stage::RunLength))
    ));
    let coded = huffman_compress(&packed).unwrap();
    assert!(matches!(
        huffman_compress(&coded),
        Err(JlError::AlreadyApplied(Stage::Huffman))
    ));
}

#[test]
fn short_file_is_not_compressed_test() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiny");
    std::fs::write(&path, b"JLC").unwrap();
    assert!(read_flags(&path, false).unwrap().is_empty());
    assert!(matches!(Block::map_compressed(&path), Err(JlError::TooSmall)));
}

#[test]
fn unknown_flags_test() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("odd");
    std::fs::write(&path, b"JLCM\x40rest").unwrap();
    assert!(matches!(
        read_flags(&path, true),
        Err(JlError::UnknownEncoding(0x40))
    ));
}

#[test]
fn compressed_file_layout_test() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    let packed = dir.path().join("input.compressed");
    std::fs::write(&input, [7_u8; 100]).unwrap();

    let stages = CompressionStages::explicit(false, true, false);
    jlcompress::compress(&stages, &input, &packed).unwrap();
    let stored = std::fs::read(&packed).unwrap();
    assert_eq!(stored.len(), HEADER_SIZE + 3);
    assert_eq!(&stored[HEADER_SIZE..], &[REPEAT_SYMBOL, 99, 7]);
    assert_eq!(read_flags(&packed, false).unwrap().bits(), 0x01);
}

#[test]
fn empty_file_round_trip_test() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty");
    let packed = dir.path().join("empty.compressed");
    let unpacked = dir.path().join("empty.decompressed");
    std::fs::write(&input, b"").unwrap();

    jlcompress::compress(&CompressionStages::default(), &input, &packed).unwrap();
    jlcompress::decompress(&packed, &unpacked).unwrap();
    assert!(std::fs::read(&unpacked).unwrap().is_empty());
}
