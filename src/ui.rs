use iocraft::prelude::*;

#[derive(Default, Props)]
pub struct MessageProps {
    pub message: String,
}

#[component]
pub fn SuccessMessage(props: &MessageProps) -> impl Into<AnyElement<'static>> {
    element! {
        View(flex_direction: FlexDirection::Row) {
            Text(content: "◆ ", color: Color::Green)
            Text(content: &props.message)
        }
    }
}

#[component]
pub fn ErrorMessage(props: &MessageProps) -> impl Into<AnyElement<'static>> {
    element! {
        View(flex_direction: FlexDirection::Row) {
            Text(content: "▲ ", color: Color::Red)
            Text(content: &props.message, color: Color::Red)
        }
    }
}

#[component]
pub fn ConfigHeader() -> impl Into<AnyElement<'static>> {
    element! {
        View(flex_direction: FlexDirection::Column) {
            View(background_color: Color::Blue) {
                Text(content: " upreq configuration ", color: Color::White)
            }
            Text(content: "Press enter to keep the value in brackets.")
        }
    }
}

#[derive(Default, Props)]
pub struct InputPromptProps {
    pub prompt: String,
    pub default: Option<String>,
    pub description: Option<String>,
}

#[component]
pub fn InputPrompt(props: &InputPromptProps) -> impl Into<AnyElement<'static>> {
    element! {
        View(flex_direction: FlexDirection::Column) {
            Text(content: "")
            View(flex_direction: FlexDirection::Row) {
                Text(weight: Weight::Bold, content: &props.prompt)
                #(props.default.as_ref().map(|default| element! {
                    Text(content: format!(" [{}]", default))
                }))
            }
            #(props.description.as_ref().map(|description| element! {
                Text(content: description, color: Color::DarkGrey)
            }))
        }
    }
}

#[derive(Default, Props)]
pub struct RequestSummaryProps {
    pub filename: String,
    pub size_bytes: u64,
    pub content_hash: String,
    pub mime_type: String,
    /// Path of the request document
    pub location: String,
}

#[component]
pub fn RequestSummary(props: &RequestSummaryProps) -> impl Into<AnyElement<'static>> {
    element! {
        View(flex_direction: FlexDirection::Column) {
            View(flex_direction: FlexDirection::Row) {
                Text(content: "┌ ")
                Text(weight: Weight::Bold, content: &props.filename)
            }
            Text(content: format!("│ size       {} bytes", props.size_bytes))
            Text(content: format!("│ sha256     {}", props.content_hash))
            Text(content: format!("│ mime type  {}", props.mime_type))
            Text(content: format!("└ {}", props.location))
        }
    }
}
