use anyhow::Result;

use crate::comments::SeedComment;

/// One short-video entry in the feed. Seed counters are display values;
/// viewer toggles never write back into them.
#[derive(Debug, Clone, PartialEq)]
pub struct ReelItem {
    pub id: String,
    pub video_url: String,
    pub username: String,
    pub description: String,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub views: String,
    pub hashtags: Vec<String>,
    pub duration: String,
}

pub trait FeedService: Send + Sync {
    fn load_reels(&self) -> Result<Vec<ReelItem>>;
}

/// Static seed content; the only feed source in this build.
#[derive(Default)]
pub struct StaticFeedService;

impl FeedService for StaticFeedService {
    fn load_reels(&self) -> Result<Vec<ReelItem>> {
        Ok(seed_reels())
    }
}

fn reel(
    id: &str,
    video_url: &str,
    username: &str,
    description: &str,
    likes: u64,
    comments: u64,
    shares: u64,
    views: &str,
    hashtags: &[&str],
    duration: &str,
) -> ReelItem {
    ReelItem {
        id: id.to_string(),
        video_url: video_url.to_string(),
        username: username.to_string(),
        description: description.to_string(),
        likes,
        comments,
        shares,
        views: views.to_string(),
        hashtags: hashtags.iter().map(|tag| tag.to_string()).collect(),
        duration: duration.to_string(),
    }
}

pub fn seed_reels() -> Vec<ReelItem> {
    vec![
        reel(
            "1",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4",
            "animalrescue",
            "Good food is the foundation of your pet's health. A proper diet prevents \
             disease, keeps the weight in check and gives your four-legged friend the \
             energy to thrive!",
            3600,
            127,
            89,
            "2.9K",
            &["rescue", "adoption", "petcare", "nutrition"],
            "0:45",
        ),
        reel(
            "2",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4",
            "petlovers_official",
            "Cutest moment of the day! Our furry friends always know how to brighten \
             things up. Who else has a companion like this at home? Tell us in the \
             comments!",
            5200,
            234,
            156,
            "4.1K",
            &["pets", "love", "cuteness", "dog"],
            "0:32",
        ),
        reel(
            "3",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerBlazes.mp4",
            "vet_tips",
            "Important tip: always watch your pet's behavior! Changes can point to \
             health problems. When in doubt, talk to a vet you trust.",
            2800,
            98,
            67,
            "1.8K",
            &["vet", "health", "tips", "care"],
            "1:12",
        ),
        reel(
            "4",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerEscapes.mp4",
            "adopt_a_friend",
            "Every adoption is a life transformed! Our furry residents are waiting for \
             a family full of love. Come meet them and find your new best friend!",
            4100,
            189,
            203,
            "3.2K",
            &["adoption", "love", "family", "rescue"],
            "0:58",
        ),
        reel(
            "5",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerFun.mp4",
            "pet_training",
            "Training your pet can be fun! With patience and affection any dog can \
             learn the basic commands. Start slow and always reward good behavior!",
            1900,
            76,
            45,
            "1.2K",
            &["training", "education", "behavior", "tips"],
            "0:41",
        ),
    ]
}

fn seed_comment(
    author: &str,
    text: &str,
    created_at: &str,
    likes: u64,
    replies: Vec<SeedComment>,
) -> SeedComment {
    SeedComment {
        author: author.to_string(),
        text: text.to_string(),
        created_at: created_at.to_string(),
        likes,
        replies,
    }
}

/// Reel id -> pre-populated comment thread, newest first. Reels without an
/// entry simply start with an empty thread.
pub fn seed_comment_threads() -> Vec<(String, Vec<SeedComment>)> {
    vec![
        (
            "1".to_string(),
            vec![
                seed_comment(
                    "Maria Silva",
                    "This is so important, thanks for sharing!",
                    "2h",
                    24,
                    vec![seed_comment(
                        "animalrescue",
                        "Glad it helps! Spread the word.",
                        "1h",
                        8,
                        vec![seed_comment(
                            "Maria Silva",
                            "Already sent it to my whole family.",
                            "45m",
                            3,
                            Vec::new(),
                        )],
                    )],
                ),
                seed_comment(
                    "Joao Santos",
                    "My dog changed completely after we fixed his diet.",
                    "3h",
                    15,
                    Vec::new(),
                ),
                seed_comment(
                    "Carla Lima",
                    "Which brand do you recommend for puppies?",
                    "5h",
                    7,
                    Vec::new(),
                ),
            ],
        ),
        (
            "2".to_string(),
            vec![
                seed_comment(
                    "Pedro Costa",
                    "Mine does the exact same thing every morning!",
                    "1h",
                    31,
                    vec![seed_comment(
                        "petlovers_official",
                        "They never miss breakfast time.",
                        "50m",
                        12,
                        Vec::new(),
                    )],
                ),
                seed_comment("Ana Rocha", "I needed this today, thank you.", "4h", 9, Vec::new()),
            ],
        ),
        (
            "3".to_string(),
            vec![seed_comment(
                "Lucas Mendes",
                "Great advice. A checkup caught my cat's problem early.",
                "2h",
                18,
                Vec::new(),
            )],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_service_returns_seed() {
        let service = StaticFeedService;
        let reels = service.load_reels().unwrap();
        assert_eq!(reels.len(), 5);
        assert_eq!(reels[0].id, "1");
        assert_eq!(reels[1].likes, 5200);
    }

    #[test]
    fn seed_threads_reference_known_reels() {
        let ids: Vec<String> = seed_reels().into_iter().map(|item| item.id).collect();
        for (reel_id, thread) in seed_comment_threads() {
            assert!(ids.contains(&reel_id), "unknown reel id {reel_id}");
            assert!(!thread.is_empty());
        }
    }
}
