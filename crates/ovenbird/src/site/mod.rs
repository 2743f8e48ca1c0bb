//! Deterministic demo content for the bakery site: the seed pages, forms,
//! snippets, and board records the service starts with.

pub mod orders;

pub use orders::{orders_board_config, standard_orders, ProductionOrder};

use crate::content::blocks::process::{
    BranchStep, DocumentStep, GatewayOption, Process, StepBlock, StepDetail,
};
use crate::content::blocks::{HeadingBlock, HeadingSize, ParagraphBlock, QuoteBlock, StreamBlock};
use crate::content::forms::{FieldType, FormDefinition, FormField};
use crate::content::pages::Page;
use crate::content::snippets::{FooterText, Person};

pub fn standard_home_page() -> Page {
    Page::new(
        "home",
        "Home",
        "The Olde Green Tree bakery serves breads and pastries from wood-fired ovens.",
    )
    .with_body(vec![
        StreamBlock::Heading(HeadingBlock {
            heading_text: "Baked fresh every morning".to_string(),
            size: HeadingSize::H2,
        }),
        StreamBlock::Paragraph(ParagraphBlock {
            body: "<p>Our bakers start before dawn so the first loaves land warm on the counter at seven.</p>"
                .to_string(),
        }),
        StreamBlock::Quote(QuoteBlock {
            text: "The rye alone is worth the queue.".to_string(),
            attribute_name: "Harbour Town Gazette".to_string(),
        }),
    ])
}

/// The standard contact form: two section markers splitting the answerable
/// fields into three groups.
pub fn standard_contact_form() -> FormDefinition {
    FormDefinition {
        slug: "contact-us".to_string(),
        title: "Contact us".to_string(),
        introduction: "Questions, custom orders, wholesale enquiries.".to_string(),
        fields: vec![
            FormField::new(FieldType::SingleLine, "Your name").required(),
            FormField::section("Contact details")
                .with_help_text("How should we reach you?"),
            FormField::new(FieldType::Email, "Email address").required(),
            FormField::new(FieldType::SingleLine, "Phone number"),
            FormField::section("Your enquiry"),
            FormField::new(FieldType::Dropdown, "Reason")
                .with_choices(["Custom order", "Wholesale", "Feedback"])
                .with_default("Custom order"),
            FormField::new(FieldType::MultiLine, "Message").required(),
        ],
        thank_you_text: "Thank you for getting in touch. We reply within two working days."
            .to_string(),
        from_address: "noreply@oldegreentree.example".to_string(),
        to_address: "counter@oldegreentree.example".to_string(),
        subject: "Contact form submission".to_string(),
    }
}

/// The documented onboarding process for new counter staff.
pub fn onboarding_process() -> Process {
    Process {
        slug: "counter-onboarding".to_string(),
        title: "Counter staff onboarding".to_string(),
        description: "From signed contract to first solo shift.".to_string(),
        start: vec![StepDetail {
            label: "Contract signed".to_string(),
            description: "People team countersigns and files the contract.".to_string(),
            lane: Some("People team".to_string()),
        }],
        steps: vec![
            StepBlock::Document(DocumentStep {
                detail: StepDetail {
                    label: "Issue handbook".to_string(),
                    description: String::new(),
                    lane: Some("People team".to_string()),
                },
                document: "staff-handbook.pdf".to_string(),
            }),
            StepBlock::Task(StepDetail {
                label: "Food hygiene training".to_string(),
                description: "Half-day certified course.".to_string(),
                lane: Some("Trainee".to_string()),
            }),
            StepBlock::ExclusiveGateway(vec![
                GatewayOption {
                    steps: vec![BranchStep::Task(StepDetail {
                        label: "Shadow a morning shift".to_string(),
                        description: String::new(),
                        lane: Some("Trainee".to_string()),
                    })],
                },
                GatewayOption {
                    steps: vec![BranchStep::Task(StepDetail {
                        label: "Shadow an afternoon shift".to_string(),
                        description: String::new(),
                        lane: Some("Trainee".to_string()),
                    })],
                },
            ]),
            StepBlock::End(StepDetail {
                label: "First solo shift".to_string(),
                description: String::new(),
                lane: Some("Shift lead".to_string()),
            }),
        ],
    }
}

pub fn standard_people() -> Vec<Person> {
    vec![
        Person::new("Olivia", "Ainsworth", "Head baker"),
        Person::new("Tariq", "Haddad", "Pastry chef"),
        Person::new("June", "Okafor", "Counter manager"),
    ]
}

pub fn footer_text() -> FooterText {
    FooterText::new("The Olde Green Tree, 4 Harbour Lane. Baking daily since 1962.")
}
