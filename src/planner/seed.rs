use crate::models::{CreateResortRequest, Difficulty};

struct DemoResort {
    name: &'static str,
    location: &'static str,
    description: &'static str,
    elevation: i64,
    number_of_trails: i64,
    difficulty: Difficulty,
    image_url: &'static str,
}

const DEMO_RESORTS: &[DemoResort] = &[
    DemoResort {
        name: "Cyber Peak",
        location: "Colorado, USA",
        description: "Experience the future of skiing at Cyber Peak. With cutting-edge facilities and breathtaking views, this resort offers an unparalleled adventure for advanced skiers.",
        elevation: 3500,
        number_of_trails: 45,
        difficulty: Difficulty::Advanced,
        image_url: "https://images.unsplash.com/photo-1605540436563-5bca919ae766?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=1469&q=80",
    },
    DemoResort {
        name: "Neon Valley",
        location: "British Columbia, Canada",
        description: "Neon Valley is a winter wonderland for intermediate skiers. With a perfect blend of challenging and accessible trails, it's the ideal destination for those looking to improve their skills.",
        elevation: 2800,
        number_of_trails: 38,
        difficulty: Difficulty::Intermediate,
        image_url: "https://images.unsplash.com/photo-1611001716885-b3402558a62b?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=1470&q=80",
    },
    DemoResort {
        name: "Quantum Ridge",
        location: "Alps, Switzerland",
        description: "Only for the most daring skiers, Quantum Ridge offers extreme slopes and unmatched thrills. With its challenging terrain and pristine snow conditions, it's a paradise for experts.",
        elevation: 4200,
        number_of_trails: 30,
        difficulty: Difficulty::Expert,
        image_url: "https://images.unsplash.com/photo-1548777123-e216912df7d8?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=1470&q=80",
    },
    DemoResort {
        name: "Digital Slopes",
        location: "Hokkaido, Japan",
        description: "Perfect for beginners, Digital Slopes offers gentle inclines and excellent instruction. Start your skiing journey in this picturesque Japanese resort.",
        elevation: 1800,
        number_of_trails: 25,
        difficulty: Difficulty::Beginner,
        image_url: "https://images.unsplash.com/photo-1551524559-a3fb5b5ecd3a?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=1470&q=80",
    },
    DemoResort {
        name: "Pixel Peaks",
        location: "Queenstown, New Zealand",
        description: "A versatile resort offering trails for all skill levels. Pixel Peaks is known for its stunning scenery and excellent snow quality throughout the season.",
        elevation: 2300,
        number_of_trails: 42,
        difficulty: Difficulty::Intermediate,
        image_url: "https://images.unsplash.com/photo-1517933165749-5bbd7f2b5b0e?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=1470&q=80",
    },
    DemoResort {
        name: "Synthwave Summit",
        location: "Aspen, USA",
        description: "Combining luxury with adventure, Synthwave Summit is a premier destination for advanced skiers looking for both challenging slopes and upscale amenities.",
        elevation: 3200,
        number_of_trails: 50,
        difficulty: Difficulty::Advanced,
        image_url: "https://images.unsplash.com/photo-1612450622914-f1738c2f7cd3?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=1470&q=80",
    },
];

/// The resorts inserted when an empty catalogue is first listed.
pub fn demo_resorts() -> Vec<CreateResortRequest> {
    DEMO_RESORTS
        .iter()
        .map(|demo| CreateResortRequest {
            name: demo.name.to_string(),
            location: demo.location.to_string(),
            description: Some(demo.description.to_string()),
            elevation: Some(demo.elevation),
            number_of_trails: Some(demo.number_of_trails),
            difficulty: Some(demo.difficulty),
            image_url: Some(demo.image_url.to_string()),
        })
        .collect()
}
