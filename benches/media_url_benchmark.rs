use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feedgram::models::{Author, FeedPost};
use feedgram::services::{MediaUrls, PostCard, Thumbnail};

fn benchmark_media_urls(c: &mut Criterion) {
    let urls = MediaUrls::new("demo");

    // A feed page's worth of posts, a third of them from authors without a profile
    let posts: Vec<FeedPost> = (0..100)
        .map(|i| FeedPost {
            id: i,
            caption: Some(format!("post {}", i)),
            image: format!("posts/{}", i),
            user_id: format!("u{}", i % 7),
            user: (i % 3 != 0).then(|| Author {
                id: format!("u{}", i % 7),
                username: Some(format!("user{}", i % 7)),
                avatar_url: Some(format!("avatars/{}", i % 7)),
            }),
        })
        .collect();

    let mut group = c.benchmark_group("media_urls");

    group.bench_function("avatar_thumbnail", |b| {
        b.iter(|| {
            urls.url(
                black_box("avatars/ana"),
                Some(Thumbnail::square(48).focus_face()),
            )
        })
    });

    group.bench_function("remote_fetch", |b| {
        b.iter(|| urls.url(black_box("https://via.placeholder.com/48"), None))
    });

    group.bench_function("feed_cards", |b| {
        b.iter(|| {
            black_box(&posts)
                .iter()
                .map(|p| PostCard::new(p, &urls, 512))
                .collect::<Vec<_>>()
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_media_urls);
criterion_main!(benches);
