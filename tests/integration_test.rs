//! Integration tests for huff-compress

use huff_compress::container::{Preamble, SIGNATURE};
use huff_compress::frequency::FrequencyTable;
use huff_compress::huffman::TrieNode;
use huff_compress::*;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::Path;

fn roundtrip_file(dir: &Path, name: &str, data: &[u8]) -> Vec<u8> {
    let input = dir.join(name);
    fs::write(&input, data).unwrap();
    let compressor = Compressor::default();
    compressor.encode(&input).unwrap();
    let packed = compressor.compressed_path(&input);
    compressor.decode(&packed).unwrap();
    fs::read(compressor.decompressed_path(&packed)).unwrap()
}

#[test]
fn test_full_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let data = "the quick brown fox jumps over the lazy dog\n".repeat(50);
    assert_eq!(roundtrip_file(dir.path(), "fox.txt", data.as_bytes()), data.as_bytes());
}

#[test]
fn test_random_utf8_roundtrip() {
    let alphabet: Vec<char> = "abcdefghij ,.\néçãõüß€—日本語😀🎉🚀".chars().collect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    for len in [1usize, 2, 7, 64, 1000, 20_000] {
        let text: String = (0..len)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();
        let compressed = compress(text.as_bytes()).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), text.as_bytes(), "len {}", len);
    }
}

#[test]
fn test_degenerate_single_symbol_file() {
    let dir = tempfile::tempdir().unwrap();
    let data = vec![b'a'; 1000];
    let restored = roundtrip_file(dir.path(), "aaaa.txt", &data);
    assert_eq!(restored, data);

    let compressed = compress(&data).unwrap();
    let header_len = u32::from_be_bytes([0, compressed[5], compressed[6], compressed[7]]) as usize;
    let trie = header::rebuild(&compressed[8..8 + header_len]).unwrap();
    match trie.root() {
        TrieNode::Internal { left, right, .. } => {
            assert!(left.as_deref().unwrap().is_leaf());
            assert!(right.is_none());
        }
        TrieNode::Leaf { .. } => panic!("root must be internal"),
    }
}

#[test]
fn test_empty_input_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.txt");
    fs::write(&input, b"").unwrap();

    let compressor = Compressor::default();
    assert!(matches!(
        compressor.encode(&input),
        Err(CompressError::EmptyInput(_))
    ));
    assert!(!compressor.compressed_path(&input).exists());

    let packed = dir.path().join("empty.txt.bin");
    fs::write(&packed, b"").unwrap();
    assert!(matches!(
        compressor.decode(&packed),
        Err(CompressError::EmptyInput(_))
    ));
    assert!(!compressor.decompressed_path(&packed).exists());
}

#[test]
fn test_junk_bit_accounting() {
    for text in ["abc", "aab", "hello world", "ééé€", "xyzzy plugh"] {
        let table = FrequencyTable::from_bytes(text.as_bytes()).unwrap();
        let codes = HuffmanTrie::from_frequencies(&table)
            .unwrap()
            .code_table()
            .unwrap();
        let bit_len = codes.encoded_bits(&table);

        let compressed = compress(text.as_bytes()).unwrap();
        let preamble = Preamble::read(&mut &compressed[..], Path::new(text)).unwrap();
        let expected = if bit_len % 8 == 0 { 0 } else { 8 - bit_len % 8 };
        assert_eq!(preamble.junk_bits as u64, expected, "{:?}", text);

        let data_bytes = compressed.len() - 8 - preamble.header_len as usize;
        assert_eq!(data_bytes as u64, (bit_len + 7) / 8);
        assert_eq!(decompress(&compressed).unwrap(), text.as_bytes());
    }
}

#[test]
fn test_header_self_consistency() {
    let text = "Ünïcödé headers keep every code: ação, 日本, 🎉, plain ascii.";
    let table = FrequencyTable::from_bytes(text.as_bytes()).unwrap();
    let trie = HuffmanTrie::from_frequencies(&table).unwrap();
    let rebuilt = header::rebuild(&header::serialize(&trie).unwrap()).unwrap();
    let original = trie.code_table().unwrap();
    assert_eq!(rebuilt.code_table().unwrap(), original);
    assert!(original.is_prefix_free());
}

#[test]
fn test_invalid_signature_file() {
    let dir = tempfile::tempdir().unwrap();
    let packed = dir.path().join("fake.txt.bin");
    fs::write(&packed, b"ZIPP\0\0\0\x01\x00garbage").unwrap();

    let compressor = Compressor::default();
    assert!(matches!(
        compressor.decode(&packed),
        Err(CompressError::InvalidContainerSignature(_))
    ));
    assert!(!compressor.decompressed_path(&packed).exists());
}

#[test]
fn test_failed_decode_keeps_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    let packed = dir.path().join("bad.bin");
    let target = dir.path().join("important.txt");
    fs::write(&packed, b"NOPE1234").unwrap();
    fs::write(&target, "precious").unwrap();

    assert!(matches!(
        Compressor::default().decode_to(&packed, &target),
        Err(CompressError::InvalidContainerSignature(_))
    ));
    assert_eq!(fs::read_to_string(&target).unwrap(), "precious");
}

#[test]
fn test_failed_stream_keeps_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    let packed = dir.path().join("cut.bin");
    let target = dir.path().join("important.txt");
    // "abc" codes as c=0 a=10 b=11: stream 10110, three junk bits.
    // Claim six data bits ending in 1 so the walk stops inside a code.
    let mut compressed = compress(b"abc").unwrap();
    let last = compressed.len() - 1;
    assert_eq!(compressed[last], 0b1011_0000);
    compressed[last] |= 0b0000_0100;
    compressed[4] = 2;
    fs::write(&packed, &compressed).unwrap();
    fs::write(&target, "precious").unwrap();

    assert!(matches!(
        Compressor::default().decode_to(&packed, &target),
        Err(CompressError::CorruptStream(_))
    ));
    assert_eq!(fs::read_to_string(&target).unwrap(), "precious");
}

#[test]
fn test_non_utf8_file_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("image.dat");
    fs::write(&input, [0x89, b'P', b'N', b'G', 0xFF, 0xFE]).unwrap();
    assert!(matches!(
        Compressor::default().encode(&input),
        Err(CompressError::NotValidInputEncoding(_))
    ));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Compressor::default().encode(dir.path().join("nope.txt"));
    assert!(matches!(result, Err(CompressError::FileNotOpenable { .. })));
}

#[test]
fn test_corrupt_stream_removes_output() {
    let dir = tempfile::tempdir().unwrap();
    let packed = dir.path().join("broken.txt.bin");
    let mut compressed = compress(b"some text to break").unwrap();
    // Drop the code stream, keep preamble and header.
    let header_len = u32::from_be_bytes([0, compressed[5], compressed[6], compressed[7]]) as usize;
    compressed.truncate(8 + header_len);
    fs::write(&packed, &compressed).unwrap();

    let compressor = Compressor::default();
    assert!(matches!(
        compressor.decode(&packed),
        Err(CompressError::CorruptStream(_))
    ));
    assert!(!compressor.decompressed_path(&packed).exists());
}

#[test]
fn test_explicit_output_paths() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.md");
    let packed = dir.path().join("archive.huf");
    let restored = dir.path().join("out.md");
    fs::write(&input, "# Title\n\nbody — text\n").unwrap();

    let compressor = Compressor::default();
    compressor.encode_to(&input, &packed).unwrap();
    assert_eq!(&fs::read(&packed).unwrap()[..4], &SIGNATURE);
    let stats = compressor.decode_to(&packed, &restored).unwrap();
    assert_eq!(fs::read(&restored).unwrap(), fs::read(&input).unwrap());
    assert_eq!(stats.decompressed_size, fs::metadata(&input).unwrap().len());
}

#[test]
fn test_compression_config() {
    let config = CodecConfig {
        buffer_size: 7,
        output_suffix: ".huf".into(),
        ..CodecConfig::default()
    };
    let compressor = Compressor::new(config);
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("cfg.txt");
    fs::write(&input, "config test data with custom buffer size €€").unwrap();

    compressor.encode(&input).unwrap();
    let packed = dir.path().join("cfg.txt.huf");
    assert!(packed.exists());
    compressor.decode(&packed).unwrap();
    assert_eq!(
        fs::read(dir.path().join("cfg-decompressed.txt")).unwrap(),
        fs::read(&input).unwrap()
    );
}

#[test]
fn test_large_repetitive_input_compresses() {
    let data = "aaaaaaaaab".repeat(10_000);
    let compressed = compress(data.as_bytes()).unwrap();
    assert!(compressed.len() * 4 < data.len());
    assert_eq!(decompress(&compressed).unwrap(), data.as_bytes());
}
