use churchhub_shared::date;
use churchhub_shared::forms::EventForm;
use churchhub_shared::{Event, Id};
use leptos::prelude::*;

use crate::components::crud::{Editor, EditorActions, Screen};
use crate::components::icons::{Pencil, Plus, Trash2};
use crate::components::image_upload::ImageUpload;
use crate::components::widgets::{ErrorAlert, Spinner, TextArea, TextField};
use crate::resource::EventsOf;

#[component]
pub fn EventsSection(screen: Screen<EventsOf>) -> impl IntoView {
    let editor = Editor::<EventForm>::new();
    let errors = screen.field_errors();
    let items = screen.items();

    let (title, set_title) = editor.bind(|f| f.title.clone(), |f, v| f.title = v);
    let (description, set_description) = editor.bind(|f| f.description.clone(), |f, v| f.description = v);
    let (location, set_location) = editor.bind(|f| f.location.clone(), |f, v| f.location = v);
    let (start, set_start) = editor.bind(|f| f.start_datetime.clone(), |f, v| f.start_datetime = v);
    let (end, set_end) = editor.bind(|f| f.end_datetime.clone(), |f, v| f.end_datetime = v);
    let (price, set_price) = editor.bind(|f| f.price.clone(), |f, v| f.price = v);
    let (image, set_image) = editor.bind(|f| f.image_url.clone(), |f, v| f.image_url = v);
    let (email, set_email) = editor.bind(|f| f.contact_email.clone(), |f, v| f.contact_email = v);
    let (phone, set_phone) = editor.bind(|f| f.contact_phone.clone(), |f, v| f.contact_phone = v);
    let (website, set_website) = editor.bind(|f| f.website.clone(), |f, v| f.website = v);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        screen.save(editor);
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h3 class="card-title">"Events"</h3>
                    <button class="btn btn-primary btn-sm gap-2" on:click=move |_| screen.create_new(editor)>
                        <Plus attr:class="h-4 w-4" /> "Add Event"
                    </button>
                </div>
                <ErrorAlert message=screen.error() />

                <Show when=move || editor.open.get()>
                    <form class="border border-base-300 rounded-box p-4 space-y-2" on:submit=on_submit>
                        <h4 class="font-semibold">{move || editor.title("Event")}</h4>
                        <div class="grid md:grid-cols-2 gap-4">
                            <TextField label="Title" name="title" value=title on_input=set_title errors=errors required=true />
                            <TextField label="Location" name="location" value=location on_input=set_location errors=errors required=true />
                            <TextField label="Start" name="start_datetime" input_type="datetime-local" value=start on_input=set_start errors=errors required=true />
                            <TextField label="End" name="end_datetime" input_type="datetime-local" value=end on_input=set_end errors=errors required=true />
                            <TextField label="Price (leave blank if free)" name="price" input_type="number" value=price on_input=set_price errors=errors />
                            <TextField label="Contact email" name="contact_email" input_type="email" value=email on_input=set_email errors=errors />
                            <TextField label="Contact phone" name="contact_phone" value=phone on_input=set_phone errors=errors />
                            <TextField label="Website" name="website" value=website on_input=set_website errors=errors />
                        </div>
                        <TextArea label="Description" name="description" value=description on_input=set_description errors=errors required=true />
                        <ImageUpload label="Event image" value=image on_change=set_image />
                        {move || errors.with(|e| e.get("image_url").map(str::to_string)).map(|msg| view! {
                            <p class="text-error text-xs">{msg}</p>
                        })}
                        <EditorActions saving=screen.saving() on_cancel=move |_| editor.close() />
                    </form>
                </Show>

                <Show when=move || screen.loading().get() && items.with(Vec::is_empty)>
                    <Spinner label="Loading events..." />
                </Show>
                <Show when=move || !screen.loading().get() && items.with(Vec::is_empty)>
                    <p class="text-center py-8 text-base-content/50">"No events yet."</p>
                </Show>

                <div class="grid md:grid-cols-2 gap-4">
                    // 编辑后整条记录被替换，按快照整体重绘
                    {move || items.get().into_iter().map(|event| view! {
                        <EventCard event=event screen=screen editor=editor />
                    }).collect_view()}
                </div>
            </div>
        </div>
    }
}

#[component]
fn EventCard(event: Event, screen: Screen<EventsOf>, editor: Editor<EventForm>) -> impl IntoView {
    let id: Id = event.id;
    let when = date::display(&event.details.start_datetime);
    let price = event.price_label();
    view! {
        <div class="card card-compact bg-base-200">
            {event.details.image_url.clone().map(|url| view! {
                <figure><img src=url alt="event" class="h-40 w-full object-cover" /></figure>
            })}
            <div class="card-body">
                <h4 class="card-title text-base">{event.details.title.clone()}</h4>
                <p class="text-sm text-base-content/70">{when}</p>
                <p class="text-sm">{event.details.location.clone().unwrap_or_default()}</p>
                <div class="flex items-center justify-between">
                    <span class=if event.is_free() { "badge badge-success" } else { "badge badge-info" }>{price}</span>
                    <div class="flex gap-1">
                        <button class="btn btn-ghost btn-xs" on:click=move |_| screen.edit(editor, id)>
                            <Pencil attr:class="h-4 w-4" />
                        </button>
                        <button class="btn btn-ghost btn-xs text-error" on:click=move |_| screen.delete(id)>
                            <Trash2 attr:class="h-4 w-4" />
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}
