use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use reasonstream::api::ChatResponse;
use reasonstream::core::sse::SseDecoder;
use reasonstream::core::think::{ReasoningMarkers, TagSplitter};

fn make_reply(paragraphs: usize) -> String {
    let base = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do eiusmod tempor ";
    let mut reply = String::from("<think>");
    for _ in 0..paragraphs {
        reply.push_str(base);
    }
    reply.push_str("</think>");
    for _ in 0..paragraphs {
        reply.push_str(base);
    }
    reply
}

fn make_sse_body(reply: &str, piece: usize) -> Vec<u8> {
    let chars: Vec<char> = reply.chars().collect();
    let mut body = String::new();
    for chunk in chars.chunks(piece) {
        let content: String = chunk.iter().collect();
        let frame = serde_json::json!({ "choices": [{ "delta": { "content": content } }] });
        body.push_str("data: ");
        body.push_str(&frame.to_string());
        body.push('\n');
    }
    body.push_str("data: [DONE]\n");
    body.into_bytes()
}

fn split_in_chunks(reply: &str, chunk_len: usize) -> usize {
    let mut splitter = TagSplitter::new(ReasoningMarkers::default());
    let mut produced = 0;
    let bytes = reply.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        let mut end = (start + chunk_len).min(bytes.len());
        while !reply.is_char_boundary(end) {
            end += 1;
        }
        let delta = splitter.push(&reply[start..end]);
        produced += delta.visible.len() + delta.reasoning.len();
        start = end;
    }
    let tail = splitter.finish();
    produced + tail.visible.len() + tail.reasoning.len()
}

fn decode_body(body: &[u8], network_chunk: usize) -> usize {
    let mut decoder = SseDecoder::new();
    let mut frames = 0;
    for chunk in body.chunks(network_chunk) {
        frames += decoder.push::<ChatResponse>(chunk).len();
    }
    decoder.finish();
    frames
}

fn bench_stream_split(c: &mut Criterion) {
    for &paragraphs in &[10usize, 200usize] {
        let reply = make_reply(paragraphs);

        let mut group = c.benchmark_group(format!("splitter_paragraphs{paragraphs}"));
        group.throughput(Throughput::Bytes(reply.len() as u64));
        for &chunk_len in &[3usize, 16, 256] {
            group.bench_function(BenchmarkId::new("push", chunk_len), |b| {
                b.iter(|| split_in_chunks(&reply, chunk_len))
            });
        }
        group.finish();

        let body = make_sse_body(&reply, 8);
        let mut group = c.benchmark_group(format!("sse_decode_paragraphs{paragraphs}"));
        group.throughput(Throughput::Bytes(body.len() as u64));
        for &network_chunk in &[64usize, 1024, 16 * 1024] {
            group.bench_function(BenchmarkId::new("push", network_chunk), |b| {
                b.iter(|| decode_body(&body, network_chunk))
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_stream_split);
criterion_main!(benches);
