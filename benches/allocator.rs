#![feature(test)]
extern crate paged_buffer;
extern crate test;
#[macro_use]
extern crate trackable;

use paged_buffer::align::Alignment;
use paged_buffer::allocator::{PagedBuffer, PagedBufferBuilder};
use paged_buffer::backend::MemoryBackend;
use test::Bencher;

fn buffer(page_size: u64) -> PagedBuffer<MemoryBackend> {
    let alignment = track_try_unwrap!(Alignment::new(256));
    track_try_unwrap!(PagedBufferBuilder::new()
        .default_page_size(page_size)
        .partition_alignment(alignment)
        .finish(MemoryBackend::new()))
}

#[bench]
fn allocate_and_free_small(b: &mut Bencher) {
    let mut buffer = buffer(1024 * 1024);
    b.iter(|| {
        let id = track_try_unwrap!(buffer.allocate(100));
        buffer.free(id);
    });
}

#[bench]
fn allocate_and_free_fragmented(b: &mut Bencher) {
    let mut buffer = buffer(1024 * 1024);

    // 一つおきに解放して、空き領域を細切れにしておく
    let ids = (0..1024)
        .map(|_| track_try_unwrap!(buffer.allocate(512)))
        .collect::<Vec<_>>();
    for id in ids.into_iter().step_by(2) {
        buffer.free(id);
    }

    let mut i = 0;
    b.iter(|| {
        let id = track_try_unwrap!(buffer.allocate((i % 4 + 1) * 128));
        buffer.free(id);
        i += 1;
    });
}

#[bench]
fn allocate_and_free_page_growth(b: &mut Bencher) {
    let mut buffer = buffer(64 * 1024);
    let _pinned = track_try_unwrap!(buffer.allocate(64 * 1024));
    b.iter(|| {
        // 毎回ページの生成と破棄が発生する
        let id = track_try_unwrap!(buffer.allocate(1024));
        buffer.free(id);
    });
}

#[bench]
fn write_partition_small(b: &mut Bencher) {
    let mut buffer = buffer(1024 * 1024);
    let id = track_try_unwrap!(buffer.allocate(256));
    let data = [0xAB; 256];
    b.iter(|| {
        track_try_unwrap!(buffer.write_partition(id, &data));
    });
}
