use churchhub_shared::forms::DonationForm;
use churchhub_shared::{DonationMethod, Id, PaymentMethod};
use leptos::prelude::*;

use crate::components::crud::{Editor, EditorActions, Screen};
use crate::components::icons::{Pencil, Plus, Trash2};
use crate::components::widgets::{ErrorAlert, Spinner, TextArea, TextField};
use crate::resource::DonationsOf;

#[component]
pub fn DonationsSection(screen: Screen<DonationsOf>) -> impl IntoView {
    let editor = Editor::<DonationForm>::new();
    let draft = editor.draft;
    let errors = screen.field_errors();
    let items = screen.items();

    let (contact_name, set_contact_name) = editor.bind(|f| f.contact_name.clone(), |f, v| f.contact_name = v);
    let (contact_info, set_contact_info) = editor.bind(|f| f.contact_info.clone(), |f, v| f.contact_info = v);
    let (note, set_note) = editor.bind(|f| f.note.clone(), |f, v| f.note = v);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        screen.save(editor);
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h3 class="card-title">"Donation Methods"</h3>
                    <button class="btn btn-primary btn-sm gap-2" on:click=move |_| screen.create_new(editor)>
                        <Plus attr:class="h-4 w-4" /> "Add Method"
                    </button>
                </div>
                <ErrorAlert message=screen.error() />

                <Show when=move || editor.open.get()>
                    <form class="border border-base-300 rounded-box p-4 space-y-2" on:submit=on_submit>
                        <h4 class="font-semibold">{move || editor.title("Donation Method")}</h4>
                        <div class="grid md:grid-cols-2 gap-4">
                            <div class="form-control w-full">
                                <label class="label" for="method"><span class="label-text">"Method"</span></label>
                                <select
                                    id="method"
                                    class="select select-bordered w-full"
                                    on:change=move |ev| {
                                        if let Some(method) = PaymentMethod::parse(&event_target_value(&ev)) {
                                            draft.update(|f| f.method = method);
                                        }
                                    }
                                >
                                    {PaymentMethod::ALL.into_iter().map(|method| view! {
                                        <option value=method.label() selected=move || draft.with(|f| f.method == method)>
                                            {method.label()}
                                        </option>
                                    }).collect_view()}
                                </select>
                            </div>
                            <TextField label="Contact name" name="contact_name" value=contact_name on_input=set_contact_name errors=errors />
                            <TextField label="Handle / account" name="contact_info" value=contact_info on_input=set_contact_info errors=errors required=true />
                        </div>
                        <TextArea label="Note" name="note" value=note on_input=set_note errors=errors />
                        <EditorActions saving=screen.saving() on_cancel=move |_| editor.close() />
                    </form>
                </Show>

                <Show when=move || screen.loading().get() && items.with(Vec::is_empty)>
                    <Spinner label="Loading donation methods..." />
                </Show>
                <Show when=move || !screen.loading().get() && items.with(Vec::is_empty)>
                    <p class="text-center py-8 text-base-content/50">"No donation methods yet."</p>
                </Show>

                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <tbody>
                            {move || items.get().into_iter().map(|item| view! {
                                <DonationRow item=item screen=screen editor=editor />
                            }).collect_view()}
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}

#[component]
fn DonationRow(item: DonationMethod, screen: Screen<DonationsOf>, editor: Editor<DonationForm>) -> impl IntoView {
    let id: Id = item.id;
    let method = item.details.method;
    view! {
        <tr>
            <td>
                <div class="flex items-center gap-3">
                    <div class="avatar placeholder">
                        <div class="bg-neutral text-neutral-content w-8 rounded-full">
                            <span>{method.badge()}</span>
                        </div>
                    </div>
                    <span class="font-semibold">{method.label()}</span>
                </div>
            </td>
            <td class="font-mono text-sm">{item.details.contact_info.clone()}</td>
            <td class="hidden md:table-cell text-sm opacity-70">{item.details.contact_name.clone().unwrap_or_default()}</td>
            <td class="text-right">
                <button class="btn btn-ghost btn-xs" on:click=move |_| screen.edit(editor, id)>
                    <Pencil attr:class="h-4 w-4" />
                </button>
                <button class="btn btn-ghost btn-xs text-error" on:click=move |_| screen.delete(id)>
                    <Trash2 attr:class="h-4 w-4" />
                </button>
            </td>
        </tr>
    }
}
