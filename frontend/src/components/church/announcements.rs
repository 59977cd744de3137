use churchhub_shared::date;
use churchhub_shared::forms::AnnouncementForm;
use churchhub_shared::models::WEEKDAY_NAMES;
use churchhub_shared::{Announcement, AnnouncementKind, Id};
use leptos::prelude::*;

use crate::components::crud::{Editor, EditorActions, Screen};
use crate::components::icons::{Pencil, Plus, Trash2};
use crate::components::image_upload::ImageUpload;
use crate::components::widgets::{ErrorAlert, Spinner, TextArea, TextField};
use crate::resource::AnnouncementsOf;

#[component]
pub fn AnnouncementsSection(screen: Screen<AnnouncementsOf>) -> impl IntoView {
    let editor = Editor::<AnnouncementForm>::new();
    let draft = editor.draft;
    let errors = screen.field_errors();
    let items = screen.items();

    let (title, set_title) = editor.bind(|f| f.title.clone(), |f, v| f.title = v);
    let (description, set_description) = editor.bind(|f| f.description.clone(), |f, v| f.description = v);
    let (posted_at, set_posted_at) = editor.bind(|f| f.posted_at.clone(), |f, v| f.posted_at = v);
    let (subcategory, set_subcategory) = editor.bind(|f| f.subcategory.clone(), |f, v| f.subcategory = v);
    let (start_time, set_start_time) = editor.bind(|f| f.start_time.clone(), |f, v| f.start_time = v);
    let (end_time, set_end_time) = editor.bind(|f| f.end_time.clone(), |f, v| f.end_time = v);
    let (recurrence_rule, set_recurrence_rule) = editor.bind(|f| f.recurrence_rule.clone(), |f, v| f.recurrence_rule = v);
    let (image, set_image) = editor.bind(|f| f.image_url.clone(), |f, v| f.image_url = v);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        screen.save(editor);
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h3 class="card-title">"Announcements"</h3>
                    <button class="btn btn-primary btn-sm gap-2" on:click=move |_| screen.create_new(editor)>
                        <Plus attr:class="h-4 w-4" /> "Add Announcement"
                    </button>
                </div>
                <ErrorAlert message=screen.error() />

                <Show when=move || editor.open.get()>
                    <form class="border border-base-300 rounded-box p-4 space-y-2" on:submit=on_submit>
                        <h4 class="font-semibold">{move || editor.title("Announcement")}</h4>
                        <div class="grid md:grid-cols-2 gap-4">
                            <TextField label="Title" name="title" value=title on_input=set_title errors=errors required=true />
                            <TextField label="Posted at" name="posted_at" input_type="datetime-local" value=posted_at on_input=set_posted_at errors=errors required=true />
                            <div class="form-control w-full">
                                <label class="label" for="kind"><span class="label-text">"Type"</span></label>
                                <select
                                    id="kind"
                                    class="select select-bordered w-full"
                                    on:change=move |ev| {
                                        if let Some(kind) = AnnouncementKind::parse(&event_target_value(&ev)) {
                                            draft.update(|f| f.kind = kind);
                                        }
                                    }
                                >
                                    {AnnouncementKind::ALL.into_iter().map(|kind| view! {
                                        <option value=kind.as_str() selected=move || draft.with(|f| f.kind == kind)>
                                            {kind.label()}
                                        </option>
                                    }).collect_view()}
                                </select>
                            </div>
                            <Show when=move || draft.with(AnnouncementForm::shows_day_selector)>
                                <div class="form-control w-full">
                                    <label class="label" for="day"><span class="label-text">"Day of week"</span></label>
                                    <select
                                        id="day"
                                        class="select select-bordered w-full"
                                        on:change=move |ev| {
                                            if let Ok(day) = event_target_value(&ev).parse::<u8>() {
                                                draft.update(|f| f.day = day);
                                            }
                                        }
                                    >
                                        {WEEKDAY_NAMES.iter().enumerate().map(|(day, name)| {
                                            let day = day as u8;
                                            view! {
                                                <option value=day.to_string() selected=move || draft.with(|f| f.day == day)>
                                                    {*name}
                                                </option>
                                            }
                                        }).collect_view()}
                                    </select>
                                </div>
                            </Show>
                            <TextField label="Subcategory" name="subcategory" value=subcategory on_input=set_subcategory errors=errors />
                            <TextField label="Start time" name="start_time" input_type="time" value=start_time on_input=set_start_time errors=errors />
                            <TextField label="End time" name="end_time" input_type="time" value=end_time on_input=set_end_time errors=errors />
                            <TextField label="Recurrence rule" name="recurrence_rule" value=recurrence_rule on_input=set_recurrence_rule errors=errors />
                            <label class="label cursor-pointer justify-start gap-2">
                                <input
                                    type="checkbox"
                                    class="checkbox checkbox-primary"
                                    prop:checked=move || draft.with(|f| f.is_special)
                                    on:change=move |ev| draft.update(|f| f.is_special = event_target_checked(&ev))
                                />
                                <span class="label-text">"Special announcement"</span>
                            </label>
                        </div>
                        <TextArea label="Description" name="description" value=description on_input=set_description errors=errors required=true />
                        <ImageUpload label="Image" value=image on_change=set_image />
                        <EditorActions saving=screen.saving() on_cancel=move |_| editor.close() />
                    </form>
                </Show>

                <Show when=move || screen.loading().get() && items.with(Vec::is_empty)>
                    <Spinner label="Loading announcements..." />
                </Show>
                <Show when=move || !screen.loading().get() && items.with(Vec::is_empty)>
                    <p class="text-center py-8 text-base-content/50">"No announcements yet."</p>
                </Show>

                <ul class="space-y-2">
                    {move || items.get().into_iter().map(|item| view! {
                        <AnnouncementRow item=item screen=screen editor=editor />
                    }).collect_view()}
                </ul>
            </div>
        </div>
    }
}

#[component]
fn AnnouncementRow(
    item: Announcement,
    screen: Screen<AnnouncementsOf>,
    editor: Editor<AnnouncementForm>,
) -> impl IntoView {
    let id: Id = item.id;
    let chip = item.day_chip();
    view! {
        <li class="flex items-start justify-between bg-base-200 rounded-box p-3">
            <div class="space-y-1">
                <div class="flex items-center gap-2">
                    <span class="font-semibold">{item.details.title.clone()}</span>
                    <span class="badge badge-outline badge-sm">{item.details.kind.label()}</span>
                    {chip.map(|day| view! { <span class="badge badge-primary badge-sm">{day}</span> })}
                    {item.details.is_special.then(|| view! { <span class="badge badge-accent badge-sm">"Special"</span> })}
                </div>
                <p class="text-sm text-base-content/70">{item.details.description.clone()}</p>
                <p class="text-xs text-base-content/50">{date::display(&item.details.posted_at)}</p>
            </div>
            <div class="flex gap-1">
                <button class="btn btn-ghost btn-xs" on:click=move |_| screen.edit(editor, id)>
                    <Pencil attr:class="h-4 w-4" />
                </button>
                <button class="btn btn-ghost btn-xs text-error" on:click=move |_| screen.delete(id)>
                    <Trash2 attr:class="h-4 w-4" />
                </button>
            </div>
        </li>
    }
}
