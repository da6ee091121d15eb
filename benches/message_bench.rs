use bytes::BytesMut;
use cluster_protocol::chain::*;
use cluster_protocol::core::codec::FrameCodec;
use cluster_protocol::core::wire::{H256, U256};
use cluster_protocol::protocol::*;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use tokio_util::codec::{Decoder, Encoder};

fn minor_block(txs: usize) -> MinorBlock {
    MinorBlock {
        header: MinorBlockHeader {
            version: 0,
            branch: Branch::create(8, 3).unwrap(),
            height: 1_000,
            coinbase_address: Address::new([1; 20], 3),
            coinbase_amount: U256::from(5_000u64),
            hash_prev_minor_block: H256::new([2; 32]),
            hash_prev_root_block: H256::new([3; 32]),
            hash_meta: H256::new([4; 32]),
            create_time: 1_520_000_000,
            difficulty: 1_000_000,
            nonce: 42,
        },
        meta: MinorBlockMeta::default(),
        tx_list: vec![Transaction::new(vec![0xAB; 120]); txs],
    }
}

fn bench_message_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_codec");
    let messages: Vec<ClusterMessage> = vec![
        Ping::new(PeerId::new(*b"0000"), vec![]).into(),
        AddRootBlockResponse {
            error_code: 0,
            switched: true,
        }
        .into(),
        AddMinorBlockRequest {
            minor_block: minor_block(100),
        }
        .into(),
        DownloadMinorBlockListResponse::new(0, vec![minor_block(50); 16]).into(),
    ];

    group.bench_function("encode", |b| {
        b.iter_batched(
            || messages.clone(),
            |msgs| {
                for m in msgs {
                    let _ = m.encode().unwrap();
                }
            },
            BatchSize::SmallInput,
        )
    });

    let large = ClusterMessage::from(DownloadMinorBlockListResponse::new(
        0,
        vec![minor_block(50); 16],
    ));
    let opcode = u32::from(large.opcode().code());
    let blob = large.encode().unwrap();
    group.throughput(Throughput::Bytes(blob.len() as u64));
    group.bench_function("decode_block_list", |b| {
        b.iter(|| {
            let _ = ClusterMessage::decode(opcode, &blob).unwrap();
        })
    });

    group.finish();
}

fn bench_frame_codec(c: &mut Criterion) {
    let frame = AddMinorBlockRequest {
        minor_block: minor_block(100),
    }
    .to_frame(7)
    .unwrap();

    c.bench_function("frame_codec_roundtrip", |b| {
        let mut codec = FrameCodec::new();
        let mut buffer = BytesMut::with_capacity(frame.encoded_len());
        b.iter(|| {
            codec.encode(frame.clone(), &mut buffer).unwrap();
            let _ = codec.decode(&mut buffer).unwrap().unwrap();
        })
    });
}

criterion_group!(benches, bench_message_codec, bench_frame_codec);
criterion_main!(benches);
